pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod models;
pub mod query;
pub mod registry;
pub mod store;
pub mod tokenizer;

pub use catalog::{ModelEntry, CATALOG_FILTERS};
pub use config::{IndexSettings, TokenizerConfig};
pub use engine::QueryEngine;
pub use error::{CatalogError, Result};
pub use index::{AttributeIndex, TextIndex, TextSearchResult};
pub use models::*;
pub use registry::FilterRegistry;
pub use store::EntryStore;
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
