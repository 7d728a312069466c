use tracing::{debug, info};

use super::keywords::KeywordSet;
use crate::constants::KEYWORD_WEIGHT;
use crate::corpus::{Chunk, Corpus};

/// A corpus chunk annotated with its keyword score for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// Position in the corpus sequence (the chunk's identity).
    pub index: usize,
    pub chunk: Chunk,
    pub score: u32,
    pub matched_keywords: Vec<String>,
}

impl ScoredChunk {
    #[inline]
    pub fn page(&self) -> i64 {
        self.chunk.page
    }
}

/// Scores chunks by keyword containment and keeps the best ones.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceRanker {
    /// Score added per contained keyword.
    pub weight: u32,
}

impl Default for RelevanceRanker {
    fn default() -> Self {
        Self {
            weight: KEYWORD_WEIGHT,
        }
    }
}

impl RelevanceRanker {
    pub fn new(weight: u32) -> Self {
        Self { weight }
    }

    /// Returns at most `limit` matching chunks, best first.
    ///
    /// Ties keep corpus order. Chunks with no matching keyword are dropped, so an
    /// empty result means "no grounding available", not an error.
    pub fn rank(&self, corpus: &Corpus, keywords: &KeywordSet, limit: usize) -> Vec<ScoredChunk> {
        if corpus.is_empty() || keywords.is_empty() || limit == 0 {
            debug!(
                chunks = corpus.len(),
                keywords = keywords.len(),
                "Nothing to rank"
            );
            return Vec::new();
        }

        let mut scored: Vec<ScoredChunk> = corpus
            .chunks()
            .iter()
            .enumerate()
            .filter_map(|(index, chunk)| self.score_chunk(index, chunk, keywords))
            .collect();

        let matched = scored.len();

        // Vec::sort_by is stable: equal scores stay in corpus order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);

        info!(
            searched = corpus.len(),
            matched,
            returned = scored.len(),
            "Ranked corpus chunks"
        );
        for (rank, c) in scored.iter().take(3).enumerate() {
            debug!(
                rank = rank + 1,
                page = c.page(),
                score = c.score,
                keywords = ?&c.matched_keywords[..c.matched_keywords.len().min(5)],
                "Top chunk"
            );
        }

        scored
    }

    fn score_chunk(&self, index: usize, chunk: &Chunk, keywords: &KeywordSet) -> Option<ScoredChunk> {
        let text = chunk.text.to_lowercase();

        let matched_keywords: Vec<String> = keywords
            .iter()
            .filter(|k| text.contains(*k))
            .map(str::to_string)
            .collect();

        if matched_keywords.is_empty() {
            return None;
        }

        let score = self.weight.saturating_mul(matched_keywords.len() as u32);

        Some(ScoredChunk {
            index,
            chunk: chunk.clone(),
            score,
            matched_keywords,
        })
    }
}
