use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::audience::Audience;
use crate::cache::file_store::FileTokenStore;
use crate::cache::memory::MemoryTokenCache;
use crate::credentials;
use crate::endpoint::TokenEndpoint;
use crate::error::OAuthError;

/// Base delay applied per consecutive endpoint failure (linear backoff).
pub const BACKOFF_BASE_MS: u64 = 1000;

/// Resolved provider configuration.
///
/// Both construction paths produce this struct — explicit fields via
/// [`OAuthProvider::new`], environment discovery via
/// [`OAuthProvider::from_env`] — so there is a single engine type rather
/// than one variant per credential source.
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    /// OAuth endpoint URL.
    pub auth_server_url: String,
    /// Audience string for ZEEBE grants (deployment specific); the other
    /// audiences resolve to fixed well-known strings.
    pub audience: String,
    pub client_id: String,
    pub client_secret: String,
    /// Sent as the `user-agent` header on every token request.
    pub user_agent: String,
    /// Token cache directory; `None` falls back to
    /// `CAMUNDA_TOKEN_CACHE_DIR` or `$HOME/.camunda`.
    pub cache_dir: Option<PathBuf>,
    /// Enable the disk tier. `CAMUNDA_TOKEN_CACHE=memory-only` overrides
    /// this to `false`.
    pub cache_on_disk: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct FailureState {
    failed: bool,
    failure_count: u32,
}

impl FailureState {
    /// Delay before the next exchange attempt. Effectively immediate on a
    /// healthy endpoint, linear in the consecutive failure count otherwise.
    /// The state is per engine, not per key: a failure streak on one
    /// audience delays the next attempt for every audience.
    fn next_delay_ms(&self) -> u64 {
        if self.failed {
            BACKOFF_BASE_MS * self.failure_count as u64
        } else {
            1
        }
    }
}

/// The token cache engine.
///
/// `get_token` serves from the in-memory map first, then from the disk
/// tier, and only then performs a (possibly backed-off) client-credentials
/// exchange. Successful acquisitions populate both tiers and arm an
/// eviction timer; exchange failures propagate to the caller and extend
/// the backoff of the next attempt. Disk-write failures are logged and
/// swallowed.
#[derive(Debug)]
pub struct OAuthProvider {
    client_id: String,
    client_secret: String,
    zeebe_audience: String,
    endpoint: TokenEndpoint,
    memory: MemoryTokenCache,
    file_store: Option<FileTokenStore>,
    failure: Mutex<FailureState>,
    // One guard per cache key, coalescing concurrent misses behind a
    // single outstanding exchange. Bounded by the number of audiences.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OAuthProvider {
    /// Build a provider from explicit configuration. Fails fast when the
    /// disk tier is enabled but the cache directory cannot be made
    /// writable.
    pub fn new(config: OAuthProviderConfig) -> Result<Self, OAuthError> {
        let use_file_cache = config.cache_on_disk && !credentials::file_cache_disabled_by_env();
        let file_store = if use_file_cache {
            let cache_dir = config
                .cache_dir
                .unwrap_or_else(credentials::cache_dir_from_env);
            Some(FileTokenStore::new(cache_dir)?)
        } else {
            None
        };

        Ok(Self {
            endpoint: TokenEndpoint::new(config.auth_server_url, config.user_agent),
            client_id: config.client_id,
            client_secret: config.client_secret,
            zeebe_audience: config.audience,
            memory: MemoryTokenCache::new(),
            file_store,
            failure: Mutex::new(FailureState::default()),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Build a provider from the Zeebe credentials in the environment.
    pub fn from_env(user_agent: impl Into<String>) -> Result<Self, OAuthError> {
        let creds = credentials::zeebe_credentials_from_env()?;
        Self::new(OAuthProviderConfig {
            audience: creds.audience(),
            auth_server_url: creds.auth_server_url,
            client_id: creds.client_id,
            client_secret: creds.client_secret,
            user_agent: user_agent.into(),
            cache_dir: None,
            cache_on_disk: true,
        })
    }

    /// Access token for a symbolic audience name. Unknown names fail
    /// before any I/O is attempted.
    pub async fn get_token(&self, audience: &str) -> Result<String, OAuthError> {
        let audience: Audience = audience.parse()?;
        self.token_for(audience).await
    }

    /// Same as [`get_token`](Self::get_token), for an already parsed
    /// audience.
    pub async fn token_for(&self, audience: Audience) -> Result<String, OAuthError> {
        let key = self.cache_key(audience);

        // Tier 1: presence implies validity, no clock check.
        if let Some(token) = self.memory.get(&key).await {
            debug!("memory cache hit for '{}'", key);
            return Ok(token.access_token);
        }

        // Concurrent misses for the same key coalesce behind one exchange:
        // waiters re-check the memory tier once the winner has populated it.
        let guard = self.in_flight_guard(&key).await;
        let _exchange_slot = guard.lock().await;
        if let Some(token) = self.memory.get(&key).await {
            debug!("coalesced with in-flight request for '{}'", key);
            return Ok(token.access_token);
        }

        // Tier 2: disk entries re-validate expiry on read.
        if let Some(store) = &self.file_store {
            if let Some(token) = store.read(&self.client_id, audience).await {
                debug!("file cache hit for '{}'", key);
                let access_token = token.access_token.clone();
                self.memory.insert(&key, token).await;
                return Ok(access_token);
            }
        }

        let delay_ms = self.failure.lock().await.next_delay_ms();
        sleep(Duration::from_millis(delay_ms)).await;

        let resolved = audience.resolve(&self.zeebe_audience);
        match self
            .endpoint
            .exchange(&self.client_id, &self.client_secret, resolved)
            .await
        {
            Ok(mut token) => {
                *self.failure.lock().await = FailureState::default();
                token.stamp_expiry();
                token.audience = Some(audience.name().to_owned());

                if let Some(store) = &self.file_store {
                    store.write(&self.client_id, audience, &token).await;
                }
                let access_token = token.access_token.clone();
                self.memory.insert(&key, token).await;
                Ok(access_token)
            }
            Err(err) => {
                let mut failure = self.failure.lock().await;
                failure.failed = true;
                failure.failure_count += 1;
                warn!(
                    "token exchange for '{}' failed ({} consecutive): {}",
                    key, failure.failure_count, err
                );
                Err(err.into())
            }
        }
    }

    fn cache_key(&self, audience: Audience) -> String {
        format!("{}-{}", self.client_id, audience)
    }

    async fn in_flight_guard(&self, key: &str) -> Arc<Mutex<()>> {
        let mut guards = self.in_flight.lock().await;
        guards.entry(key.to_owned()).or_default().clone()
    }

    #[cfg(test)]
    pub(crate) async fn cached(&self, audience: Audience) -> Option<crate::token::Token> {
        self.memory.get(&self.cache_key(audience)).await
    }

    #[cfg(test)]
    pub(crate) async fn failure_state(&self) -> (bool, u32) {
        let failure = self.failure.lock().await;
        (failure.failed, failure.failure_count)
    }

    #[cfg(test)]
    pub(crate) async fn next_delay_ms(&self) -> u64 {
        self.failure.lock().await.next_delay_ms()
    }
}
