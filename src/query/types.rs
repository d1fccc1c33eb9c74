//! Core types for parsed text queries

use serde::{Deserialize, Serialize};

/// Presence requirement of a clause
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// Optional; contributes score, matching any optional clause is enough
    #[default]
    Should,
    /// Required (`+term`)
    Must,
    /// Prohibited (`-term`)
    MustNot,
}

/// How a clause's text is matched against index terms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
    /// Analyzed words, each matched exactly
    Term(String),
    /// `term*`: the last word matches any index term it prefixes
    Prefix(String),
    /// `term~N`: the last word matches index terms within edit distance N
    Fuzzy {
        term: String,
        distance: Option<u32>,
    },
    /// `"a phrase"`: all words at consecutive positions in one field
    Phrase(String),
}

impl ClauseKind {
    /// Raw clause text as typed by the user
    pub fn text(&self) -> &str {
        match self {
            ClauseKind::Term(t) | ClauseKind::Prefix(t) | ClauseKind::Phrase(t) => t,
            ClauseKind::Fuzzy { term, .. } => term,
        }
    }
}

/// A single clause of a query string
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub occur: Occur,
    /// Field qualifier as written (`field:term`), if any
    pub field: Option<String>,
    pub kind: ClauseKind,
    pub boost: f32,
}

impl Clause {
    pub fn new(kind: ClauseKind) -> Self {
        Self {
            occur: Occur::Should,
            field: None,
            kind,
            boost: 1.0,
        }
    }

    pub fn with_occur(mut self, occur: Occur) -> Self {
        self.occur = occur;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

/// Flat list of clauses in query order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub clauses: Vec<Clause>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
