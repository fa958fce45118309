//! Token cache tiers: the in-process map with eviction timers and the
//! crash-surviving on-disk file store.

pub mod file_store;
pub mod memory;
