use serde::{Deserialize, Serialize};

/// Ordered set of structured filters, one optional value per attribute key
///
/// Order matters only for error reporting and for the intersection order;
/// the result of an AND join does not depend on it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pairs: Vec<(String, Option<String>)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter with a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, Some(value.into()));
        self
    }

    /// Add a filter key whose value may be unset
    pub fn with_optional(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Set the value for a key
    ///
    /// A key that is already present keeps its position and takes the new
    /// value.
    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// All keys, including those without a value
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Pairs whose value is set and non-empty
    pub fn with_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(k, v)| v.filter(|v| !v.is_empty()).map(|v| (k, v)))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (k, v) in iter {
            filters.push(k, Some(v.into()));
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_constructors() {
        let filters = Filters::new()
            .with("tag", "nlp")
            .with_optional("license", None)
            .with("name", "");

        assert_eq!(filters.len(), 3);
        assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["tag", "license", "name"]);
        assert_eq!(filters.with_values().collect::<Vec<_>>(), vec![("tag", "nlp")]);
    }

    #[test]
    fn test_repeated_key_replaces_value() {
        let filters = Filters::new()
            .with("tags", "vision")
            .with("license", "mit")
            .with("tags", "nlp");

        assert_eq!(filters.len(), 2);
        assert_eq!(
            filters.iter().collect::<Vec<_>>(),
            vec![("tags", Some("nlp")), ("license", Some("mit"))]
        );

        let cleared = filters.with_optional("license", None);
        assert_eq!(cleared.with_values().collect::<Vec<_>>(), vec![("tags", "nlp")]);

        let collected: Filters = vec![("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(
            collected.iter().collect::<Vec<_>>(),
            vec![("a", Some("3")), ("b", Some("2"))]
        );
    }

    #[test]
    fn test_filters_from_iter_keeps_order() {
        let filters: Filters = vec![("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(
            filters.iter().collect::<Vec<_>>(),
            vec![("b", Some("2")), ("a", Some("1"))]
        );
    }
}
