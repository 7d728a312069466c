//! Completion-service access (text + vision Messages API).
//!
//! The pipeline talks to the model only through [`CompletionService`]; the HTTP
//! implementation is [`AnthropicClient`], and [`MockCompletionService`] replays
//! scripted responses for tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use client::AnthropicClient;
pub use error::{CompletionError, CompletionResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompletionService;
pub use types::{CompletionRequest, CompletionResponse, ContentPart, ImageSource, Message, Role};

/// A text/vision completion endpoint.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns `true` if a credential is available for calls.
    fn is_configured(&self) -> bool;

    /// Model identifier placed on outgoing requests.
    fn model(&self) -> &str;

    /// Sends one request. No retries are attempted.
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<CompletionResponse>;
}
