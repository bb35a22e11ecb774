use thiserror::Error;

/// Failures talking to the store. Error documents the store itself returns
/// are not errors here; they arrive as [`crate::StoreResponse::Error`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request to {url} timed out")]
    Timeout { url: String },

    #[error("store transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("store returned HTTP {status} without an error document for {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("failed to decode store response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}
