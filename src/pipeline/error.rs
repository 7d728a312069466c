use thiserror::Error;

use super::types::Stage;
use crate::completion::CompletionError;
use crate::constants::API_KEY_ENV;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{} not configured", API_KEY_ENV)]
    CredentialMissing,

    #[error("{stage} failed: {source}")]
    Upstream {
        stage: Stage,
        #[source]
        source: CompletionError,
    },
}

impl PipelineError {
    /// Attributes a completion failure to `stage`.
    pub fn upstream(stage: Stage, source: CompletionError) -> Self {
        match source {
            CompletionError::MissingCredential => Self::CredentialMissing,
            source => Self::Upstream { stage, source },
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Upstream { stage, .. } => Some(*stage),
            Self::CredentialMissing => None,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
