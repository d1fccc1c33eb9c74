use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::tokenizer::language_support;

/// Fields of a catalog entry that take part in ranked text search
pub const DEFAULT_SEARCHABLE_FIELDS: &[&str] = &[
    "name",
    "tags",
    "urls",
    "files",
    "overrides",
    "license",
    "galleryId",
    "id",
];

/// Fields left out of the per-entry content blob
pub const DEFAULT_CONTENT_EXCLUDED_FIELDS: &[&str] = &["id", "name"];

/// Index settings configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub tokenizer_config: TokenizerConfig,
    pub searchable_fields: Vec<String>,
    pub content_excluded_fields: Vec<String>,
    /// Edit distance used for `term~` without an explicit distance
    pub default_fuzzy_distance: u32,
    /// Upper bound for `term~N`; larger requests are clamped
    pub max_fuzzy_distance: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            tokenizer_config: TokenizerConfig::default(),
            searchable_fields: DEFAULT_SEARCHABLE_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            content_excluded_fields: DEFAULT_CONTENT_EXCLUDED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            default_fuzzy_distance: 1,
            max_fuzzy_distance: 2,
        }
    }
}

impl IndexSettings {
    /// Parse settings from JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: IndexSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Replace the searchable fields
    pub fn with_searchable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the tokenizer configuration
    pub fn with_tokenizer_config(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer_config = config;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.searchable_fields.is_empty() {
            return Err(CatalogError::InvalidSettings(
                "at least one searchable field is required".to_string(),
            ));
        }
        let tc = &self.tokenizer_config;
        if tc.min_token_length > tc.max_token_length {
            return Err(CatalogError::InvalidSettings(format!(
                "min_token_length {} exceeds max_token_length {}",
                tc.min_token_length, tc.max_token_length
            )));
        }
        if language_support(&tc.language).is_none() {
            return Err(CatalogError::InvalidSettings(format!(
                "unsupported tokenizer language {:?}",
                tc.language
            )));
        }
        Ok(())
    }

    /// Clamp a requested fuzzy distance to the configured maximum
    pub fn fuzzy_distance(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_fuzzy_distance)
            .min(self.max_fuzzy_distance)
    }
}

/// Tokenizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
    /// Stemmer and stopword language, e.g. `english` or `german`
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_stopwords: false,
            stem: true,
            min_token_length: 1,
            max_token_length: 64,
            language: "english".to_string(),
        }
    }
}

impl TokenizerConfig {
    /// Lowercasing only; no stemming or stopword removal
    pub fn plain() -> Self {
        Self {
            stem: false,
            remove_stopwords: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let settings = IndexSettings::default();
        assert_eq!(settings.searchable_fields.len(), 8);
        assert!(settings.searchable_fields.contains(&"galleryId".to_string()));
        assert_eq!(settings.content_excluded_fields, vec!["id", "name"]);

        let tokenizer_config = TokenizerConfig::default();
        assert!(tokenizer_config.lowercase);
        assert!(tokenizer_config.stem);
        assert!(!tokenizer_config.remove_stopwords);
    }

    #[test]
    fn test_from_json_partial() {
        let settings =
            IndexSettings::from_json_str(r#"{"searchable_fields": ["name"], "max_fuzzy_distance": 3}"#)
                .unwrap();
        assert_eq!(settings.searchable_fields, vec!["name"]);
        assert_eq!(settings.max_fuzzy_distance, 3);
        assert_eq!(settings.default_fuzzy_distance, 1);
        assert!(settings.tokenizer_config.lowercase);

        let german =
            IndexSettings::from_json_str(r#"{"tokenizer_config": {"language": "german"}}"#).unwrap();
        assert_eq!(german.tokenizer_config.language, "german");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let err = IndexSettings::from_json_str(r#"{"searchable_fields": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSettings(_)));

        let mut settings = IndexSettings::default();
        settings.tokenizer_config.min_token_length = 10;
        settings.tokenizer_config.max_token_length = 2;
        assert!(settings.validate().is_err());

        let err = IndexSettings::from_json_str(r#"{"tokenizer_config": {"language": "klingon"}}"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSettings(_)));

        assert!(matches!(
            IndexSettings::from_json_str("not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_fuzzy_distance_clamp() {
        let settings = IndexSettings::default();
        assert_eq!(settings.fuzzy_distance(None), 1);
        assert_eq!(settings.fuzzy_distance(Some(2)), 2);
        assert_eq!(settings.fuzzy_distance(Some(9)), 2);
    }

    #[test]
    fn test_settings_builder() {
        let settings = IndexSettings::default()
            .with_searchable_fields(["name", "tags"])
            .with_tokenizer_config(TokenizerConfig::plain());
        assert_eq!(settings.searchable_fields, vec!["name", "tags"]);
        assert!(!settings.tokenizer_config.stem);
    }
}
