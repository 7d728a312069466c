//! Lexical retrieval over the corpus.
//!
//! Questions are reduced to a [`KeywordSet`]; every chunk is scored by how many
//! keywords its lower-cased text contains, and the best chunks become the
//! [`AnalysisContext`] handed to the final prompt.
//!
//! # Matching precision
//!
//! Containment is plain substring matching, not word-boundary aware: `"lead"`
//! matches inside `"leadership"`. This is kept for compatibility with existing
//! answer quality baselines and is a known source of false-positive matches.

pub mod context;
pub mod keywords;
pub mod ranker;


pub use context::AnalysisContext;
pub use keywords::{KeywordExtractor, KeywordSet};
pub use ranker::{RelevanceRanker, ScoredChunk};
