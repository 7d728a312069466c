use thiserror::Error;

/// Errors raised while fetching or decoding corpus objects.
///
/// `Clone` so a failed coalesced load can be handed to every waiter.
#[derive(Debug, Clone, Error)]
pub enum CorpusError {
    /// The object store answered with a non-success status.
    #[error("object '{object}' returned HTTP {status}")]
    ObjectStatus { object: String, status: u16 },

    /// The request never produced a response.
    #[error("failed to fetch object '{object}': {reason}")]
    Transport { object: String, reason: String },

    /// The body was not the expected JSON shape.
    #[error("failed to decode object '{object}': {reason}")]
    Decode { object: String, reason: String },

    /// `metadata.json` could not be loaded; no partial corpus is produced.
    #[error("corpus data unavailable: {reason}")]
    MetadataUnavailable { reason: String },

    #[error("invalid corpus configuration: {reason}")]
    Config { reason: String },
}

pub type CorpusResult<T> = Result<T, CorpusError>;
