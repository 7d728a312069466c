use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A page-tagged fragment of the reference document; the unit of retrieval.
///
/// Fields other than `page` and `text` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub page: i64,
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chunk {
    pub fn new(page: i64, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
            extra: Map::new(),
        }
    }
}

/// The full preprocessed reference document.
///
/// Immutable once built. Chunk order is shard order (ascending index) and, within
/// a shard, file order; a chunk's position is its identity for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    metadata: Value,
    search_index: Option<Value>,
    chunks: Vec<Chunk>,
}

impl Corpus {
    pub fn new(metadata: Value, search_index: Option<Value>, chunks: Vec<Chunk>) -> Self {
        Self {
            metadata,
            search_index,
            chunks,
        }
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn search_index(&self) -> Option<&Value> {
        self.search_index.as_ref()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// An empty corpus is a valid, degraded result.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of distinct pages referenced by the chunks.
    pub fn distinct_pages(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| c.page)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
