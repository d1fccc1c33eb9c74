use std::collections::HashMap;

use tracing::warn;

use crate::error::{CatalogError, Result};
use crate::models::{DocNo, Entry};

use super::normalize::content_blob;

/// Outcome of inserting one record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ingested {
    pub docno: DocNo,
    /// True when the id was already present and its record was overwritten
    pub replaced: bool,
}

/// Canonical id → record map in insertion order
///
/// A duplicate id overwrites the stored record in place: it keeps the docno
/// and insertion position of the first record with that id.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    contents: Vec<String>,
    docnos: HashMap<String, DocNo>,
    duplicates: Vec<String>,
    content_excluded_fields: Vec<String>,
    seen: usize,
}

impl EntryStore {
    pub fn new(content_excluded_fields: Vec<String>) -> Self {
        Self {
            content_excluded_fields,
            ..Default::default()
        }
    }

    /// Build a store from one complete batch
    ///
    /// Fails on the first record without an id; no partial store is returned.
    pub fn ingest<I>(entries: I, content_excluded_fields: Vec<String>) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut store = Self::new(content_excluded_fields);
        for entry in entries {
            store.insert(entry)?;
        }
        store.report_duplicates();
        Ok(store)
    }

    /// Insert a single record, overwriting any record with the same id
    pub fn insert(&mut self, entry: Entry) -> Result<Ingested> {
        let position = self.seen;
        self.seen += 1;

        let id = entry
            .id()
            .ok_or(CatalogError::MissingId { position })?
            .to_string();
        let content = content_blob(&entry, &self.content_excluded_fields);

        if let Some(&docno) = self.docnos.get(&id) {
            warn!(id = %id, position, "duplicate entry id, overwriting stored record");
            let slot = docno as usize;
            self.entries[slot] = entry;
            self.contents[slot] = content;
            self.duplicates.push(id);
            return Ok(Ingested {
                docno,
                replaced: true,
            });
        }

        let docno = self.entries.len() as DocNo;
        self.entries.push(entry);
        self.contents.push(content);
        self.docnos.insert(id, docno);
        Ok(Ingested {
            docno,
            replaced: false,
        })
    }

    /// Emit the summary warning for duplicate ids, if any were seen
    pub fn report_duplicates(&self) {
        if !self.duplicates.is_empty() {
            warn!(count = self.duplicates.len(), "duplicate entry ids during ingestion");
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.docno(id).and_then(|docno| self.get_by_docno(docno))
    }

    pub fn get_by_docno(&self, docno: DocNo) -> Option<&Entry> {
        self.entries.get(docno as usize)
    }

    /// Resolve a docno, failing if the store has no such record
    pub fn resolve(&self, docno: DocNo) -> Result<&Entry> {
        self.get_by_docno(docno)
            .ok_or(CatalogError::ReferenceNotFound(docno))
    }

    pub fn docno(&self, id: &str) -> Option<DocNo> {
        self.docnos.get(id).copied()
    }

    /// Lowercased content blob of the record with this id
    pub fn content(&self, id: &str) -> Option<&str> {
        self.docno(id)
            .and_then(|docno| self.contents.get(docno as usize))
            .map(String::as_str)
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// `(docno, record)` pairs in insertion order
    pub fn iter_docs(&self) -> impl Iterator<Item = (DocNo, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i as DocNo, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Ids that were overwritten, once per duplicate occurrence
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}
