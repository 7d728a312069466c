//! Reference corpus loading and memoization.
//!
//! The corpus lives in a remote object store as `metadata.json`, an optional
//! `search-index.json`, and an open-ended run of `chunks_<N>.json` shards whose
//! count is not published. [`CorpusStore`] probes shards in order and stops
//! after a configurable run of consecutive misses, so a single missing shard
//! between two present ones is tolerated.
//!
//! The loaded [`Corpus`] is held in a single-entry cache; concurrent first loads
//! are coalesced into one scan, and [`CorpusStore::invalidate`] /
//! [`CorpusStore::refresh`] reload it without a process restart.

pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod types;


pub use config::CorpusConfig;
pub use error::{CorpusError, CorpusResult};
#[cfg(any(test, feature = "mock"))]
pub use source::MockObjectSource;
pub use source::{HttpObjectSource, ObjectSource};
pub use store::CorpusStore;
pub use types::{Chunk, Corpus};
