use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use stop_words::{get, LANGUAGE};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizerConfig;

/// Position gap between consecutive values of one field
///
/// Keeps phrases from matching across the elements of a list.
pub const POSITION_INCREMENT_GAP: u32 = 100;

/// Stemming algorithm and stopword list for a configured language name
pub fn language_support(name: &str) -> Option<(Algorithm, LANGUAGE)> {
    let support = match name.to_ascii_lowercase().as_str() {
        "arabic" => (Algorithm::Arabic, LANGUAGE::Arabic),
        "danish" => (Algorithm::Danish, LANGUAGE::Danish),
        "dutch" => (Algorithm::Dutch, LANGUAGE::Dutch),
        "english" => (Algorithm::English, LANGUAGE::English),
        "finnish" => (Algorithm::Finnish, LANGUAGE::Finnish),
        "french" => (Algorithm::French, LANGUAGE::French),
        "german" => (Algorithm::German, LANGUAGE::German),
        "greek" => (Algorithm::Greek, LANGUAGE::Greek),
        "hungarian" => (Algorithm::Hungarian, LANGUAGE::Hungarian),
        "italian" => (Algorithm::Italian, LANGUAGE::Italian),
        "norwegian" => (Algorithm::Norwegian, LANGUAGE::Norwegian),
        "portuguese" => (Algorithm::Portuguese, LANGUAGE::Portuguese),
        "romanian" => (Algorithm::Romanian, LANGUAGE::Romanian),
        "russian" => (Algorithm::Russian, LANGUAGE::Russian),
        "spanish" => (Algorithm::Spanish, LANGUAGE::Spanish),
        "swedish" => (Algorithm::Swedish, LANGUAGE::Swedish),
        "turkish" => (Algorithm::Turkish, LANGUAGE::Turkish),
        _ => return None,
    };
    Some(support)
}

/// Text tokenizer with stemming and stopword removal
///
/// Words come from Unicode word segmentation and are split again on any
/// non-alphanumeric character, so `bert-embeddings`, `huggingface.co` and
/// `q4_0` each yield several tokens.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    ///
    /// An unsupported language falls back to English; settings validation
    /// rejects it before an index is built.
    pub fn new(config: &TokenizerConfig) -> Self {
        let (algorithm, language) = language_support(&config.language).unwrap_or_else(|| {
            warn!(language = %config.language, "unsupported tokenizer language, using english");
            (Algorithm::English, LANGUAGE::English)
        });

        let stemmer = if config.stem {
            Some(Stemmer::create(algorithm))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(language)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Split text into raw words: segmentation and case folding only
    ///
    /// Query-side prefix and fuzzy terms use this so they are compared
    /// against the index without being stemmed.
    pub fn split_words(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .flat_map(|word| word.split(|c: char| !c.is_alphanumeric()))
            .filter(|piece| !piece.is_empty())
            .map(|piece| {
                if self.config.lowercase {
                    piece.to_lowercase()
                } else {
                    piece.to_string()
                }
            })
            .collect()
    }

    /// Apply length bounds, stopword removal and stemming to one raw word
    ///
    /// Returns `None` when the word is filtered out.
    pub fn normalize_word(&self, word: &str) -> Option<String> {
        let len = word.chars().count();
        if len < self.config.min_token_length || len > self.config.max_token_length {
            return None;
        }

        if self.stopwords.contains(word) {
            return None;
        }

        match &self.stemmer {
            Some(stemmer) => Some(stemmer.stem(word).to_string()),
            None => Some(word.to_string()),
        }
    }

    /// Tokenize text into a vector of terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.split_words(text)
            .iter()
            .filter_map(|word| self.normalize_word(word))
            .collect()
    }

    /// Tokenize and return (term, position) pairs in order
    ///
    /// Positions are 0-indexed and count every word, including words that
    /// were filtered out, so phrase adjacency is not faked by removed words.
    pub fn tokenize_with_positions_ordered(&self, text: &str) -> Vec<(String, u32)> {
        self.split_words(text)
            .iter()
            .enumerate()
            .filter_map(|(pos, word)| self.normalize_word(word).map(|t| (t, pos as u32)))
            .collect()
    }

    /// Map each term to its positions in the text
    pub fn tokenize_with_positions(&self, text: &str) -> HashMap<String, Vec<u32>> {
        self.tokenize_values_with_positions([text])
    }

    /// Map each term to its positions across several values of one field
    ///
    /// Each value is positioned after the previous one plus
    /// `POSITION_INCREMENT_GAP`, so no two values are adjacent.
    pub fn tokenize_values_with_positions<I, S>(&self, values: I) -> HashMap<String, Vec<u32>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions: HashMap<String, Vec<u32>> = HashMap::new();
        let mut base = 0u32;
        for value in values {
            let words = self.split_words(value.as_ref());
            for (pos, word) in words.iter().enumerate() {
                if let Some(term) = self.normalize_word(word) {
                    positions.entry(term).or_default().push(base + pos as u32);
                }
            }
            base += words.len() as u32 + POSITION_INCREMENT_GAP;
        }
        positions
    }
}
