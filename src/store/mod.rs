pub mod entry_store;
pub mod normalize;

pub use entry_store::{EntryStore, Ingested};
pub use normalize::{content_blob, flatten};
