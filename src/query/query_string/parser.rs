//! Parser for query strings
//!
//! # Grammar
//!
//! ```text
//! query     := clause*
//! clause    := ('+' | '-')* (TERM COLON)? value modifier*
//! value     := TERM | QUOTED
//! modifier  := TILDE distance? | CARET boost?
//! ```
//!
//! Parsing never fails. Tokens that do not fit the grammar (a stray `:`,
//! `~` or `^`, an operator with nothing after it) are skipped, and a term
//! that analyzes to nothing is dropped later by the text index.

use tracing::trace;

use super::lexer::{Lexer, Token};
use crate::query::types::{Clause, ClauseKind, Occur, ParsedQuery};

/// Parser for Lucene-style query strings
pub struct QueryStringParser {
    lexer: Lexer,
    current_token: Token,
}

impl QueryStringParser {
    /// Create a new parser for the given query string
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();

        Self {
            lexer,
            current_token,
        }
    }

    /// Parse the whole input into a flat list of clauses
    pub fn parse(&mut self) -> ParsedQuery {
        let mut clauses = Vec::new();

        while self.current_token != Token::Eof {
            if let Some(clause) = self.parse_clause() {
                clauses.push(clause);
            }
        }

        trace!(clauses = ?clauses, "parsed query");
        ParsedQuery { clauses }
    }

    /// Parse: clause := ('+' | '-')* (TERM COLON)? value modifier*
    fn parse_clause(&mut self) -> Option<Clause> {
        let occur = self.parse_occur();

        let mut field = None;
        let value = match self.current_token.clone() {
            Token::Term(text) => {
                self.advance();
                if self.current_token == Token::Colon {
                    self.advance();
                    field = Some(text);
                    self.parse_value()?
                } else {
                    Value::Word(text)
                }
            }
            Token::QuotedString(text) => {
                self.advance();
                Value::Phrase(text)
            }
            Token::Eof => return None,
            _ => {
                // Stray modifier or separator
                self.advance();
                return None;
            }
        };

        let (fuzzy, boost) = self.parse_modifiers();

        let kind = match value {
            Value::Phrase(text) => ClauseKind::Phrase(text),
            Value::Word(text) => match fuzzy {
                Some(distance) => ClauseKind::Fuzzy {
                    term: text.trim_end_matches('*').to_string(),
                    distance,
                },
                None if text.ends_with('*') => {
                    ClauseKind::Prefix(text.trim_end_matches('*').to_string())
                }
                None => ClauseKind::Term(text),
            },
        };

        if kind.text().trim().is_empty() {
            return None;
        }

        let mut clause = Clause::new(kind).with_occur(occur).with_boost(boost);
        clause.field = field;
        Some(clause)
    }

    /// Leading `+`/`-` operators; the last one wins
    fn parse_occur(&mut self) -> Occur {
        let mut occur = Occur::Should;
        loop {
            match self.current_token {
                Token::Plus => occur = Occur::Must,
                Token::Minus => occur = Occur::MustNot,
                _ => return occur,
            }
            self.advance();
        }
    }

    /// Value after `field:`
    fn parse_value(&mut self) -> Option<Value> {
        let value = match self.current_token.clone() {
            Token::Term(text) => Value::Word(text),
            Token::QuotedString(text) => Value::Phrase(text),
            _ => return None,
        };
        self.advance();
        Some(value)
    }

    /// Parse: modifier* ; returns (fuzzy distance request, boost)
    fn parse_modifiers(&mut self) -> (Option<Option<u32>>, f32) {
        let mut fuzzy = None;
        let mut boost = 1.0;

        loop {
            match self.current_token {
                Token::Tilde(distance) => fuzzy = Some(distance),
                Token::Caret(value) => boost = value.unwrap_or(1.0),
                _ => return (fuzzy, boost),
            }
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }
}

enum Value {
    Word(String),
    Phrase(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Clause> {
        QueryStringParser::new(input).parse().clauses
    }

    fn term(s: &str) -> ClauseKind {
        ClauseKind::Term(s.to_string())
    }

    #[test]
    fn test_simple_terms_are_optional() {
        let clauses = parse("bert nlp");
        assert_eq!(clauses.len(), 2);
        assert!(clauses.iter().all(|c| c.occur == Occur::Should));
        assert_eq!(clauses[0].kind, term("bert"));
        assert_eq!(clauses[1].kind, term("nlp"));
    }

    #[test]
    fn test_required_and_prohibited() {
        let clauses = parse("+bert -gpt2 llama");
        assert_eq!(clauses[0].occur, Occur::Must);
        assert_eq!(clauses[1].occur, Occur::MustNot);
        assert_eq!(clauses[2].occur, Occur::Should);
    }

    #[test]
    fn test_field_qualifier() {
        let clauses = parse("name:bert tags:\"text generation\"");
        assert_eq!(clauses[0].field.as_deref(), Some("name"));
        assert_eq!(clauses[0].kind, term("bert"));
        assert_eq!(clauses[1].field.as_deref(), Some("tags"));
        assert_eq!(
            clauses[1].kind,
            ClauseKind::Phrase("text generation".to_string())
        );
    }

    #[test]
    fn test_prefix_fuzzy_boost() {
        let clauses = parse("ber* lama~ bart~2 bert^3");
        assert_eq!(clauses[0].kind, ClauseKind::Prefix("ber".to_string()));
        assert_eq!(
            clauses[1].kind,
            ClauseKind::Fuzzy {
                term: "lama".to_string(),
                distance: None
            }
        );
        assert_eq!(
            clauses[2].kind,
            ClauseKind::Fuzzy {
                term: "bart".to_string(),
                distance: Some(2)
            }
        );
        assert_eq!(clauses[3].kind, term("bert"));
        assert_eq!(clauses[3].boost, 3.0);
    }

    #[test]
    fn test_bare_caret_keeps_default_boost() {
        let clauses = parse("bert^");
        assert_eq!(clauses[0].boost, 1.0);
    }

    #[test]
    fn test_unsupported_syntax_degrades() {
        // Stray operators are skipped, boolean keywords are plain words
        let clauses = parse(": ~ ^2 + bert AND nlp -");
        let texts: Vec<&str> = clauses.iter().map(|c| c.kind.text()).collect();
        assert_eq!(texts, vec!["bert", "AND", "nlp"]);
        assert_eq!(clauses[0].occur, Occur::Must);
    }

    #[test]
    fn test_lone_wildcard_is_dropped() {
        assert!(parse("*").is_empty());
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn test_field_without_value() {
        let clauses = parse("name: -gpt2");
        // `name:` has no value and is dropped, the next clause still parses
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].occur, Occur::MustNot);
        assert_eq!(clauses[0].field, None);
    }
}
