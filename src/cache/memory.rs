use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::token::Token;

/// In-memory token tier.
///
/// Presence implies validity: every insert arms a one-shot eviction task
/// that removes the entry no later than its expiry, so the read path never
/// checks the clock. Re-arming a key cancels the previous task, and
/// dropping the cache cancels all of them. Eviction tasks hold only a weak
/// reference to the map, so pending timers never keep a dropped cache
/// alive.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    state: Arc<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    tokens: RwLock<HashMap<String, Token>>,
    // std Mutex: accessed briefly and from the sync Drop path.
    evictors: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Token> {
        self.state.tokens.read().await.get(key).cloned()
    }

    /// Insert a token and arm its eviction. An entry that is already past
    /// expiry is not inserted; if the key held an older token it is removed
    /// synchronously instead.
    pub async fn insert(&self, key: &str, token: Token) {
        let remaining = token.remaining_millis();
        if remaining <= 0 {
            debug!("token for '{}' is already expired, not caching", key);
            self.remove(key).await;
            return;
        }

        self.state.tokens.write().await.insert(key.to_owned(), token);

        let evictor = tokio::spawn(evict_after(
            Arc::downgrade(&self.state),
            key.to_owned(),
            remaining as u64,
        ));
        if let Ok(mut evictors) = self.state.evictors.lock() {
            if let Some(previous) = evictors.insert(key.to_owned(), evictor) {
                previous.abort();
            }
        }
    }

    pub async fn remove(&self, key: &str) {
        self.state.tokens.write().await.remove(key);
        if let Ok(mut evictors) = self.state.evictors.lock() {
            if let Some(evictor) = evictors.remove(key) {
                evictor.abort();
            }
        }
    }
}

impl Drop for MemoryTokenCache {
    fn drop(&mut self) {
        if let Ok(mut evictors) = self.state.evictors.lock() {
            for (_, evictor) in evictors.drain() {
                evictor.abort();
            }
        }
    }
}

/// One-shot eviction. Only ever touches the memory tier; the disk tier
/// ages out lazily on read.
async fn evict_after(state: Weak<CacheState>, key: String, delay_ms: u64) {
    sleep(Duration::from_millis(delay_ms)).await;
    if let Some(state) = state.upgrade() {
        debug!("evicting expired token for '{}'", key);
        state.tokens.write().await.remove(&key);
        if let Ok(mut evictors) = state.evictors.lock() {
            evictors.remove(&key);
        }
    }
}
