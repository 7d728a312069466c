//! Request orchestration.
//!
//! [`QuizAnalyzer`] walks the [`Stage`] machine for one image: extraction with
//! its topic fallback, lexical retrieval against the cached corpus, then a
//! single analysis call whose prompt carries the grounding context.
//!
//! Corpus and extraction problems degrade the answer (no context, "medium"
//! accuracy) instead of failing the request. Only completion-call failures
//! in the extraction or analysis stage surface as [`PipelineError`].

pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod types;


pub use error::{PipelineError, PipelineResult};
pub use orchestrator::QuizAnalyzer;
pub use prompt::build_analysis_prompt;
pub use types::{AccuracyTier, AnalysisMetadata, AnalysisOutcome, Stage};
