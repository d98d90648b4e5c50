use thiserror::Error;

/// Failures of a catalog request.
///
/// `Cancelled` only ever comes from a superseded or closed episode and is kept
/// apart from the others so callers can drop it silently.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("{message}")]
    Service { status: u16, message: String },

    /// The catalog answered but reported no match (`"Response": "False"`)
    #[error("{0}")]
    NotFound(String),

    #[error("Malformed catalog response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl CatalogError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Cancelled)
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        CatalogError::Network(err.to_string())
    }
}
