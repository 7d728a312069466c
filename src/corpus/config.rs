use crate::config::Config;
use crate::constants::{DEFAULT_SHARD_CAP, DEFAULT_SHARD_GAP_LIMIT};

use super::error::{CorpusError, CorpusResult};

/// Shard-probing heuristic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Consecutive failed shard fetches that end the scan.
    pub shard_gap_limit: usize,
    /// Shard indices `0..shard_cap` are the most that will ever be probed.
    pub shard_cap: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            shard_gap_limit: DEFAULT_SHARD_GAP_LIMIT,
            shard_cap: DEFAULT_SHARD_CAP,
        }
    }
}

impl From<&Config> for CorpusConfig {
    fn from(config: &Config) -> Self {
        Self {
            shard_gap_limit: config.shard_gap_limit,
            shard_cap: config.shard_cap,
        }
    }
}

impl CorpusConfig {
    pub fn shard_gap_limit(mut self, limit: usize) -> Self {
        self.shard_gap_limit = limit;
        self
    }

    pub fn shard_cap(mut self, cap: usize) -> Self {
        self.shard_cap = cap;
        self
    }

    pub fn validate(&self) -> CorpusResult<()> {
        if self.shard_gap_limit == 0 {
            return Err(CorpusError::Config {
                reason: "shard_gap_limit must be > 0".to_string(),
            });
        }
        if self.shard_cap == 0 {
            return Err(CorpusError::Config {
                reason: "shard_cap must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
