//! Text query language
//!
//! Query strings are parsed into a flat list of [`Clause`]s, each with a
//! presence requirement, an optional field qualifier, a match kind and a
//! boost. Evaluation happens in [`crate::index::TextIndex`].

pub mod query_string;
pub mod types;

pub use query_string::QueryStringParser;
pub use types::{Clause, ClauseKind, Occur, ParsedQuery};

/// Parse a query string; never fails
pub fn parse(input: &str) -> ParsedQuery {
    QueryStringParser::new(input).parse()
}
