//! Public entry point: ranked search composed with attribute filtering

use tracing::debug;

use crate::config::IndexSettings;
use crate::error::Result;
use crate::index::{AttributeIndex, AttributeIndexBuilder, TextIndex, TextIndexBuilder};
use crate::models::{DocNo, Entry, Filters, SearchHit, SearchResults};
use crate::registry::FilterRegistry;
use crate::store::EntryStore;

/// Search engine over one immutable batch of entries
///
/// Built once from a complete batch; afterwards every query takes `&self`.
/// Filter names are registered before querying.
pub struct QueryEngine {
    settings: IndexSettings,
    store: EntryStore,
    attributes: AttributeIndex,
    text: TextIndex,
    registry: FilterRegistry,
}

impl QueryEngine {
    /// Ingest a batch and build both indexes in a single pass
    ///
    /// Fails with `MissingId` on the first entry without an id; nothing is
    /// built in that case. A duplicate id overwrites the stored record and
    /// its new content is posted next to the old postings for that record.
    pub fn build<I>(entries: I, settings: IndexSettings) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        settings.validate()?;

        let mut store = EntryStore::new(settings.content_excluded_fields.clone());
        let mut attributes = AttributeIndexBuilder::new();
        let mut text = TextIndexBuilder::new(&settings);

        for entry in entries {
            let ingested = store.insert(entry)?;
            let stored = store.resolve(ingested.docno)?;
            attributes.add(ingested.docno, stored);
            text.add(ingested.docno, stored);
        }
        store.report_duplicates();

        let attributes = attributes.build();
        let text = text.build();

        debug!(
            entries = store.len(),
            duplicates = store.duplicate_count(),
            attribute_keys = attributes.key_count(),
            terms = text.term_count(),
            "built catalog index"
        );

        Ok(Self {
            settings,
            store,
            attributes,
            text,
            registry: FilterRegistry::new(),
        })
    }

    /// Build with default settings
    pub fn with_defaults<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        Self::build(entries, IndexSettings::default())
    }

    /// Allow filtering on an attribute name
    pub fn register_filter(&mut self, name: &str) -> bool {
        self.registry.register(name)
    }

    pub fn register_filters<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.registry.register(name.as_ref());
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.is_registered(name)
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn attributes(&self) -> &AttributeIndex {
        &self.attributes
    }

    pub fn text_index(&self) -> &TextIndex {
        &self.text
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Ranked text search without filters
    pub fn search(&self, query: &str) -> Result<SearchResults<'_>> {
        self.get_filtered_data(Some(query), &Filters::new())
    }

    /// Entries whose `field` holds exactly `value`, in insertion order
    pub fn lookup(&self, field: &str, value: &str) -> Result<Vec<&Entry>> {
        self.resolve_all(self.attributes.lookup(field, value).iter())
    }

    /// Strict attribute filter
    ///
    /// Every key must be registered, including keys whose value is empty;
    /// the first unregistered key fails the call with `UnregisteredFilter`.
    /// Pairs with a value are AND-joined; if there are none the result is
    /// empty. Results come back in insertion order.
    pub fn filter(&self, filters: &Filters) -> Result<Vec<&Entry>> {
        self.registry.validate(filters.keys())?;

        let docs = self.attributes.intersect(filters.iter());
        debug!(filters = filters.len(), hits = docs.len(), "strict filter");

        self.resolve_all(docs.iter())
    }

    /// Lenient search: optional text query, then registered filters
    ///
    /// With a non-blank query the candidates are the ranked text hits, and
    /// `matched_fields` reports where the query matched. Without one, every
    /// entry is a candidate in insertion order and hits carry no score.
    /// Filters whose key is registered and whose value is non-empty narrow
    /// the candidates without reordering them; all other filters are
    /// ignored.
    pub fn get_filtered_data(
        &self,
        query: Option<&str>,
        filters: &Filters,
    ) -> Result<SearchResults<'_>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let (mut candidates, matched_fields): (Vec<(DocNo, Option<f32>)>, Vec<String>) =
            match query {
                Some(q) => {
                    let result = self.text.search(q);
                    let ranked = result
                        .hits
                        .iter()
                        .map(|h| (h.docno, Some(h.score)))
                        .collect();
                    (ranked, result.matched_fields)
                }
                None => (
                    self.store.iter_docs().map(|(docno, _)| (docno, None)).collect(),
                    Vec::new(),
                ),
            };
        let total = candidates.len();

        let active: Vec<(&str, &str)> = filters
            .with_values()
            .filter(|(key, _)| self.registry.is_registered(key))
            .collect();

        if !active.is_empty() {
            let allowed = self
                .attributes
                .intersect(active.iter().map(|&(key, value)| (key, Some(value))));
            candidates.retain(|(docno, _)| allowed.contains(*docno));
        }

        debug!(
            query = query.unwrap_or(""),
            candidates = total,
            active_filters = active.len(),
            hits = candidates.len(),
            "filtered search"
        );

        let hits = candidates
            .into_iter()
            .map(|(docno, score)| {
                Ok(SearchHit {
                    entry: self.store.resolve(docno)?,
                    score,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchResults {
            hits,
            matched_fields,
        })
    }

    fn resolve_all(&self, docs: impl Iterator<Item = DocNo>) -> Result<Vec<&Entry>> {
        docs.map(|docno| self.store.resolve(docno)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use serde_json::json;

    fn entries(values: Vec<serde_json::Value>) -> Vec<Entry> {
        values
            .into_iter()
            .map(|v| Entry::try_from(v).unwrap())
            .collect()
    }

    fn ids(entries: &[&Entry]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|e| e.id())
            .map(String::from)
            .collect()
    }

    fn engine() -> QueryEngine {
        let mut engine = QueryEngine::with_defaults(entries(vec![
            json!({"id": "a", "name": "bert-embeddings", "tags": ["nlp", "vision"], "license": "MIT"}),
            json!({"id": "b", "name": "gpt2", "tags": ["nlp"], "license": "apache"}),
            json!({"id": "c", "name": "llama", "tags": ["chat"], "license": "mit"}),
        ]))
        .unwrap();
        engine.register_filters(["tags", "license"]);
        engine
    }

    #[test]
    fn test_strict_filter() {
        let engine = engine();
        let nlp = engine.filter(&Filters::new().with("tags", "nlp")).unwrap();
        assert_eq!(ids(&nlp), vec!["a", "b"]);

        let vision = engine.filter(&Filters::new().with("tags", "vision")).unwrap();
        assert_eq!(ids(&vision), vec!["a"]);

        let both = engine
            .filter(&Filters::new().with("tags", "nlp").with("license", "mit"))
            .unwrap();
        assert_eq!(ids(&both), vec!["a"]);
    }

    #[test]
    fn test_repeated_filter_key_uses_last_value() {
        let engine = engine();
        let filters = Filters::new().with("tags", "vision").with("tags", "nlp");

        assert_eq!(ids(&engine.filter(&filters).unwrap()), vec!["a", "b"]);
        assert_eq!(
            engine.get_filtered_data(None, &filters).unwrap().ids(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_strict_filter_rejects_unregistered_key() {
        let engine = engine();
        let err = engine
            .filter(&Filters::new().with("tags", "nlp").with("color", "red"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnregisteredFilter(ref k) if k == "color"));

        // Empty values are still validated
        let err = engine
            .filter(&Filters::new().with_optional("color", None))
            .unwrap_err();
        assert!(err.is_query_scoped());

        // The engine stays usable
        assert_eq!(engine.filter(&Filters::new().with("tags", "chat")).unwrap().len(), 1);
    }

    #[test]
    fn test_strict_filter_without_values_is_empty() {
        let engine = engine();
        let result = engine
            .filter(&Filters::new().with("tags", "").with_optional("license", None))
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_lenient_without_query_keeps_insertion_order() {
        let engine = engine();
        let results = engine.get_filtered_data(None, &Filters::new()).unwrap();
        assert_eq!(results.ids(), vec!["a", "b", "c"]);
        assert!(results.hits.iter().all(|h| h.score.is_none()));
        assert!(results.matched_fields.is_empty());

        let blank = engine.get_filtered_data(Some("   "), &Filters::new()).unwrap();
        assert_eq!(blank.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lenient_ignores_unregistered_and_empty_filters() {
        let engine = engine();
        let filters = Filters::new()
            .with("color", "red")
            .with("tags", "")
            .with_optional("license", None);
        let results = engine.get_filtered_data(None, &filters).unwrap();
        assert_eq!(results.ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lenient_filters_ranked_hits() {
        let engine = engine();
        let results = engine
            .get_filtered_data(Some("nlp"), &Filters::new().with("license", "MIT"))
            .unwrap();
        assert_eq!(results.ids(), vec!["a"]);
        assert_eq!(results.matched_fields, vec!["tags".to_string()]);
        assert!(results.hits[0].score.is_some());
    }

    #[test]
    fn test_search_attribution() {
        let engine = engine();
        let results = engine.search("bert").unwrap();
        assert_eq!(results.ids(), vec!["a"]);
        assert_eq!(results.matched_fields, vec!["name".to_string()]);
    }

    #[test]
    fn test_lookup() {
        let engine = engine();
        assert_eq!(ids(&engine.lookup("license", "mit").unwrap()), vec!["a", "c"]);
        assert!(engine.lookup("license", "gpl").unwrap().is_empty());
    }

    #[test]
    fn test_build_rejects_invalid_settings() {
        let settings = IndexSettings::default().with_searchable_fields(Vec::<String>::new());
        let err = QueryEngine::build(Vec::new(), settings).err().unwrap();
        assert!(matches!(err, CatalogError::InvalidSettings(_)));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryEngine>();
    }
}
