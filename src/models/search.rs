use super::entry::Entry;

/// One result row: the entry and its text relevance score
///
/// `score` is `None` when the results were produced without a text query.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub score: Option<f32>,
}

/// Ordered results plus the fields the text query matched in
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResults<'a> {
    pub hits: Vec<SearchHit<'a>>,
    pub matched_fields: Vec<String>,
}

impl<'a> SearchResults<'a> {
    pub fn entries(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.hits.iter().map(|h| h.entry)
    }

    /// Entry ids in result order
    pub fn ids(&self) -> Vec<&'a str> {
        self.hits.iter().filter_map(|h| h.entry.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
