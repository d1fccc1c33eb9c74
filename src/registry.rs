use std::collections::BTreeSet;

use crate::error::{CatalogError, Result};

/// Attribute names callers are allowed to filter on
///
/// Names are case-folded. Membership does not depend on index content: a
/// registered name that no entry uses simply filters down to nothing.
#[derive(Clone, Debug, Default)]
pub struct FilterRegistry {
    names: BTreeSet<String>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter name; returns false if it was already registered
    pub fn register(&mut self, name: &str) -> bool {
        self.names.insert(name.to_lowercase())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Fail on the first key that is not registered
    pub fn validate<'a, I>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match keys.into_iter().find(|k| !self.is_registered(k)) {
            Some(key) => Err(CatalogError::UnregisteredFilter(key.to_string())),
            None => Ok(()),
        }
    }

    /// Registered names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
