use thiserror::Error;

use crate::models::DocNo;

/// Main error type for catalog index operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Entry at position {position} does not have an id")]
    MissingId { position: usize },

    #[error("Filter {0} is not registered")]
    UnregisteredFilter(String),

    #[error("Entry with reference {0} was not found")]
    ReferenceNotFound(DocNo),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for catalog index operations
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Check if this error signals a broken index rather than a bad request
    ///
    /// A defect means the index instance must be rebuilt; any other error is
    /// scoped to the call (or build) that produced it.
    pub fn is_defect(&self) -> bool {
        matches!(self, CatalogError::ReferenceNotFound(_))
    }

    /// Check if the index instance is still usable after this error
    pub fn is_query_scoped(&self) -> bool {
        matches!(self, CatalogError::UnregisteredFilter(_))
    }
}
