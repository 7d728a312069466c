//! Cross-cutting, shared constants.
//!
//! Retrieval weights and pagination limits live here so the ranker, the corpus
//! loader and the configuration layer agree on the same defaults.

/// Public folder holding `metadata.json`, `search-index.json` and `chunks_<N>.json`.
pub const DEFAULT_CORPUS_BASE_URL: &str =
    "https://raw.githubusercontent.com/gianca-oss/quiz-enhanced/main/data/processed-v3/";

pub const METADATA_OBJECT: &str = "metadata.json";
pub const SEARCH_INDEX_OBJECT: &str = "search-index.json";

/// Builds the object name of shard `index` (`chunks_0.json`, `chunks_1.json`, ...).
pub fn shard_object_name(index: usize) -> String {
    format!("chunks_{index}.json")
}

/// Consecutive shard misses that end the scan.
pub const DEFAULT_SHARD_GAP_LIMIT: usize = 2;

/// Hard bound on probed shard indices, regardless of the miss pattern.
pub const DEFAULT_SHARD_CAP: usize = 50;

/// Score contributed by each keyword contained in a chunk.
pub const KEYWORD_WEIGHT: u32 = 10;

/// Tokens must be strictly longer than this (in characters) to become keywords.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// At most this many tokens are taken from each answer option.
pub const OPTION_KEYWORD_CAP: usize = 3;

/// Number of ranked chunks placed in the grounding context.
pub const DEFAULT_CONTEXT_CHUNKS: usize = 30;

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const EXTRACTION_MAX_TOKENS: u32 = 3000;
pub const EXTRACTION_TEMPERATURE: f32 = 0.0;
pub const TOPIC_MAX_TOKENS: u32 = 100;
pub const TOPIC_TEMPERATURE: f32 = 0.0;
pub const ANALYSIS_MAX_TOKENS: u32 = 4000;
pub const ANALYSIS_TEMPERATURE: f32 = 0.05;

/// Value reported as `processingMethod` in analysis metadata.
pub const PROCESSING_METHOD: &str = "with-documents";

/// Environment variable carrying the completion-service credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
