//! Exact-match attribute postings used for structured filtering

use roaring::RoaringBitmap;
use std::collections::HashMap;

use crate::models::{DocNo, Entry};
use crate::store::EntryStore;

/// Case-folded posting key for a field/value pair
pub fn attribute_key(field: &str, value: &str) -> String {
    format!("{}:{}", field, value).to_lowercase()
}

/// Accumulates attribute postings during ingestion
#[derive(Debug, Default)]
pub struct AttributeIndexBuilder {
    postings: HashMap<String, RoaringBitmap>,
}

impl AttributeIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post every string value of the entry under its field
    pub fn add(&mut self, docno: DocNo, entry: &Entry) {
        for (field, value) in entry.fields() {
            for v in value.attribute_values() {
                self.postings
                    .entry(attribute_key(field, v))
                    .or_default()
                    .insert(docno);
            }
        }
    }

    pub fn build(self) -> AttributeIndex {
        AttributeIndex {
            postings: self.postings,
        }
    }
}

/// Reverse lookup from `field:value` to the documents carrying it
#[derive(Debug, Default)]
pub struct AttributeIndex {
    postings: HashMap<String, RoaringBitmap>,
}

impl AttributeIndex {
    /// Index every record currently held by a store
    pub fn build(store: &EntryStore) -> Self {
        let mut builder = AttributeIndexBuilder::new();
        for (docno, entry) in store.iter_docs() {
            builder.add(docno, entry);
        }
        builder.build()
    }

    /// Documents whose `field` holds exactly `value`, ignoring case
    pub fn lookup(&self, field: &str, value: &str) -> RoaringBitmap {
        self.postings
            .get(&attribute_key(field, value))
            .cloned()
            .unwrap_or_default()
    }

    /// AND-join of lookups over the given pairs, in order
    ///
    /// Pairs without a value, or with an empty one, are skipped. The first
    /// remaining pair seeds the result and each further pair intersects it.
    /// If no pair remains the result is empty.
    pub fn intersect<'a, I>(&self, pairs: I) -> RoaringBitmap
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut result: Option<RoaringBitmap> = None;

        for (field, value) in pairs {
            let value = match value {
                Some(v) if !v.is_empty() => v,
                _ => continue,
            };

            result = Some(match result {
                None => self.lookup(field, value),
                Some(mut acc) => {
                    match self.postings.get(&attribute_key(field, value)) {
                        Some(ids) => acc &= ids,
                        None => acc.clear(),
                    }
                    acc
                }
            });

            if result.as_ref().map(|r| r.is_empty()).unwrap_or(false) {
                break;
            }
        }

        result.unwrap_or_default()
    }

    /// Number of distinct `field:value` keys
    pub fn key_count(&self) -> usize {
        self.postings.len()
    }
}
