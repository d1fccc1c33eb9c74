pub mod entry;
pub mod filter;
pub mod search;

pub use entry::{DocNo, Entry, FieldValue, ID_FIELD};
pub use filter::Filters;
pub use search::{SearchHit, SearchResults};
