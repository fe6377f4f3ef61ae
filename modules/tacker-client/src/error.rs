use thiserror::Error;

pub type Result<T> = std::result::Result<T, TackerError>;

#[derive(Debug, Error)]
pub enum TackerError {
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog rejected the call. `message` is the catalog's own error
    /// text when the body carried one.
    #[error("Catalog API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// An update addressed a record the catalog does not have.
    #[error("VNFD {0} not found in catalog")]
    NotFound(String),

    #[error("Unreadable catalog response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TackerError {
    fn from(err: reqwest::Error) -> Self {
        TackerError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for TackerError {
    fn from(err: serde_json::Error) -> Self {
        TackerError::Parse(err.to_string())
    }
}
