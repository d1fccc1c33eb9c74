//! Model-gallery records and their conversion into searchable entries

use serde::{Deserialize, Serialize};

use crate::models::{Entry, FieldValue};

/// Attribute names a model search registers as filters
pub const CATALOG_FILTERS: &[&str] = &["tags", "license", "urls", "name", "files", "galleryId"];

/// Marker in the name of models that are served locally
pub const LOCAL_MODEL_MARKER: &str = "localmodels";

/// A model file with its checksum
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub filename: String,
    pub sha256: String,
    pub uri: String,
}

/// Gallery a model is published in
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    pub url: String,
    pub name: String,
}

/// A model record as served by the model gallery
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub url: String,
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub overrides: Option<serde_json::Value>,
    #[serde(default)]
    pub files: Vec<ModelFile>,
    pub gallery: Gallery,
}

impl ModelEntry {
    /// `gallery@name`, unique across galleries
    pub fn gallery_id(&self) -> String {
        format!("{}@{}", self.gallery.name, self.name)
    }

    pub fn is_local(&self) -> bool {
        self.name.contains(LOCAL_MODEL_MARKER)
    }

    /// Flatten into a searchable entry
    ///
    /// The entry id is a stable hash of the gallery id. `url` and `urls` are
    /// merged into one list and files are reduced to their URIs.
    pub fn to_entry(&self) -> Entry {
        let gallery_id = self.gallery_id();

        let urls: Vec<FieldValue> = std::iter::once(&self.url)
            .chain(&self.urls)
            .filter(|u| !u.is_empty())
            .map(|u| FieldValue::from(u.as_str()))
            .collect();

        let files: Vec<FieldValue> = self
            .files
            .iter()
            .map(|f| FieldValue::from(f.uri.as_str()))
            .collect();

        let overrides = self
            .overrides
            .as_ref()
            .map(|o| o.to_string())
            .unwrap_or_default();

        Entry::new()
            .with("id", unique_hash(&gallery_id))
            .with("name", self.name.as_str())
            .with("urls", FieldValue::List(urls))
            .with(
                "tags",
                FieldValue::List(self.tags.iter().map(|t| FieldValue::from(t.as_str())).collect()),
            )
            .with("license", self.license.as_str())
            .with("overrides", FieldValue::Text(overrides))
            .with("files", FieldValue::List(files))
            .with("galleryId", FieldValue::Text(gallery_id))
    }
}

/// Stable 8-digit hex hash used as the entry id
pub fn unique_hash(input: &str) -> String {
    format!("{:08x}", crc32fast::hash(input.as_bytes()))
}

/// Models whose name marks them as locally served
pub fn local_models(models: &[ModelEntry]) -> Vec<&ModelEntry> {
    models.iter().filter(|m| m.is_local()).collect()
}

/// Convert a batch of gallery records into entries, keeping their order
pub fn to_entries<'a, I>(models: I) -> Vec<Entry>
where
    I: IntoIterator<Item = &'a ModelEntry>,
{
    models.into_iter().map(ModelEntry::to_entry).collect()
}
