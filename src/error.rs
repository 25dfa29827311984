//! Error taxonomy for the conversion pipeline.
//!
//! Per-item failures (`InvalidConfiguration`) are recovered by the caller and
//! the offending input is skipped; `NoValidConfigurations` is the only
//! batch-terminal failure.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A share-link matched a protocol prefix but could not be decoded into
    /// a usable outbound.
    #[error("invalid {protocol} configuration: {reason}")]
    InvalidConfiguration { protocol: String, reason: String },

    /// Remote retrieval failed after the direct attempt and every relay.
    #[error("failed to fetch {url}")]
    FetchFailure { url: String },

    /// Every item in the batch failed to parse.
    #[error("no valid configurations found")]
    NoValidConfigurations,

    /// The top-level input claimed to be a sing-box document but was not
    /// valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid(protocol: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            protocol: protocol.to_string(),
            reason: reason.into(),
        }
    }
}
