use thiserror::Error;

use crate::constants::API_KEY_ENV;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service credential missing (set {})", API_KEY_ENV)]
    MissingCredential,

    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion service request failed: {0}")]
    Transport(String),

    #[error("failed to decode completion response: {0}")]
    Decode(String),

    #[error("invalid completion client configuration: {0}")]
    Config(String),
}

pub type CompletionResult<T> = Result<T, CompletionError>;
