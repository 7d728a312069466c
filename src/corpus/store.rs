use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::config::CorpusConfig;
use super::error::{CorpusError, CorpusResult};
use super::source::ObjectSource;
use super::types::{Chunk, Corpus};
use crate::constants::{METADATA_OBJECT, SEARCH_INDEX_OBJECT, shard_object_name};

/// Fetches the corpus once and memoizes it for the life of the store.
pub struct CorpusStore {
    source: Arc<dyn ObjectSource>,
    config: CorpusConfig,
    cache: Cache<(), Arc<Corpus>>,
}

impl std::fmt::Debug for CorpusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusStore")
            .field("location", &self.source.location())
            .field("config", &self.config)
            .field("cached", &self.cache.contains_key(&()))
            .finish()
    }
}

impl CorpusStore {
    pub fn new(source: Arc<dyn ObjectSource>, config: CorpusConfig) -> CorpusResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            cache: Cache::builder().max_capacity(1).build(),
        })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Base location of the object store.
    pub fn location(&self) -> &str {
        self.source.location()
    }

    /// Returns the corpus, loading it on first use.
    ///
    /// Concurrent callers during the first load share a single scan. A failed
    /// load is not cached; the next call tries again.
    pub async fn load(&self) -> CorpusResult<Arc<Corpus>> {
        self.cache
            .try_get_with((), self.fetch_corpus())
            .await
            .map_err(|e| (*e).clone())
    }

    /// Returns the cached corpus without any network activity.
    pub async fn cached(&self) -> Option<Arc<Corpus>> {
        self.cache.get(&()).await
    }

    /// Drops the cached corpus; the next [`load`](Self::load) refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }

    /// Drops the cached corpus and loads it again.
    pub async fn refresh(&self) -> CorpusResult<Arc<Corpus>> {
        self.invalidate().await;
        self.load().await
    }

    #[instrument(skip(self), fields(location = self.source.location()))]
    async fn fetch_corpus(&self) -> CorpusResult<Arc<Corpus>> {
        info!("Loading corpus");

        let metadata: Value = self.fetch_json(METADATA_OBJECT).await.map_err(|e| {
            warn!(error = %e, "Corpus metadata unavailable");
            CorpusError::MetadataUnavailable {
                reason: e.to_string(),
            }
        })?;

        let search_index = match self.fetch_json::<Value>(SEARCH_INDEX_OBJECT).await {
            Ok(index) => Some(index),
            Err(e) => {
                debug!(error = %e, "No search index, continuing without it");
                None
            }
        };

        let chunks = self.scan_shards().await;

        info!(
            chunks = chunks.len(),
            has_search_index = search_index.is_some(),
            "Corpus loaded"
        );

        Ok(Arc::new(Corpus::new(metadata, search_index, chunks)))
    }

    /// Probes `chunks_0.json`, `chunks_1.json`, ... one at a time.
    ///
    /// The miss counter resets only on a successful shard; the scan ends when it
    /// reaches `shard_gap_limit` or after `shard_cap` indices.
    async fn scan_shards(&self) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut consecutive_misses = 0usize;

        for index in 0..self.config.shard_cap {
            let object = shard_object_name(index);

            match self.fetch_json::<Vec<Chunk>>(&object).await {
                Ok(shard) => {
                    debug!(shard = %object, chunks = shard.len(), "Shard loaded");
                    consecutive_misses = 0;
                    chunks.extend(shard);
                }
                Err(e) => {
                    consecutive_misses += 1;
                    debug!(
                        shard = %object,
                        error = %e,
                        consecutive_misses,
                        "Shard gap"
                    );
                    if consecutive_misses >= self.config.shard_gap_limit {
                        break;
                    }
                }
            }
        }

        chunks
    }

    async fn fetch_json<T: DeserializeOwned>(&self, object: &str) -> CorpusResult<T> {
        let body = self.source.fetch(object).await?;
        serde_json::from_slice(&body).map_err(|e| CorpusError::Decode {
            object: object.to_string(),
            reason: e.to_string(),
        })
    }
}
