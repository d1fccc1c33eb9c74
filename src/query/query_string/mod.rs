//! Query string parser
//!
//! Supports syntax like:
//! - `bert nlp` (optional terms, OR-combined)
//! - `+bert -gpt2` (required / prohibited)
//! - `"text generation"` (phrase)
//! - `lla*`, `lama~1`, `bert^2` (prefix, fuzzy, boost)
//! - `tags:nlp` (field qualifier)
//!
//! # Example
//!
//! ```rust
//! use catalog_index::query::query_string::QueryStringParser;
//!
//! let query = QueryStringParser::new("+bert -gpt2").parse();
//! assert_eq!(query.clauses.len(), 2);
//! ```

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use parser::QueryStringParser;
