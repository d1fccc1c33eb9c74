//! Attribute and full-text indexes derived from the entry store

pub mod attribute;
pub mod fuzzy;
pub mod postings;
pub mod scoring;
pub mod text;

pub use attribute::{attribute_key, AttributeIndex, AttributeIndexBuilder};
pub use postings::{Posting, PostingList};
pub use text::{ScoredDoc, TextIndex, TextIndexBuilder, TextSearchResult};
