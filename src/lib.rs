//! Quizdoc library crate (used by the server binary and integration tests).
//!
//! Answers multiple-choice quizzes read from an image, grounding the model's
//! answers in passages of a sharded reference corpus.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CorpusStore`], [`Corpus`], [`Chunk`] - Memoized corpus loading
//! - [`QuizAnalyzer`], [`AnalysisOutcome`] - Request orchestration
//!
//! ## Retrieval
//! - [`KeywordExtractor`], [`RelevanceRanker`], [`AnalysisContext`]
//!
//! ## Model Access
//! - [`CompletionService`], [`AnthropicClient`] - Messages API
//! - [`QuestionExtractor`], [`parse_questions`] - Question transcription
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod completion;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod extraction;
pub mod gateway;
pub mod pipeline;
pub mod retrieval;

#[cfg(any(test, feature = "mock"))]
pub use completion::MockCompletionService;
pub use completion::{
    AnthropicClient, CompletionError, CompletionRequest, CompletionResponse, CompletionResult,
    CompletionService, ImageSource,
};
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use corpus::MockObjectSource;
pub use corpus::{
    Chunk, Corpus, CorpusConfig, CorpusError, CorpusResult, CorpusStore, HttpObjectSource,
    ObjectSource,
};
pub use extraction::{ExtractionOutcome, OptionLabel, Question, QuestionExtractor, parse_questions};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use pipeline::{
    AccuracyTier, AnalysisMetadata, AnalysisOutcome, PipelineError, PipelineResult, QuizAnalyzer,
    Stage,
};
pub use retrieval::{AnalysisContext, KeywordExtractor, KeywordSet, RelevanceRanker, ScoredChunk};
