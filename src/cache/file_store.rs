use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::audience::Audience;
use crate::error::OAuthError;
use crate::token::Token;

/// On-disk token tier, one JSON file per (client id, audience) pair.
///
/// Survives process restarts, so the read path re-validates expiry against
/// the clock instead of trusting a timer. Writes are best effort; the
/// caller's token request never fails because the disk tier did.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    /// Create the cache directory if absent and verify it is writable.
    /// An unusable directory is a fatal configuration error, surfaced here
    /// rather than on first use.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, OAuthError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| unusable_dir(&cache_dir, &e))?;

        let probe = cache_dir.join(".oauth-cache-probe");
        fs::write(&probe, b"").map_err(|e| unusable_dir(&cache_dir, &e))?;
        let _ = fs::remove_file(&probe);

        Ok(Self { cache_dir })
    }

    pub fn token_file(&self, client_id: &str, audience: Audience) -> PathBuf {
        self.cache_dir
            .join(format!("oauth-token-{}-{}.json", client_id, audience))
    }

    /// Read the cached token for a key. Anything short of a well-formed,
    /// unexpired record is a cache miss, never an error.
    pub async fn read(&self, client_id: &str, audience: Audience) -> Option<Token> {
        let path = self.token_file(client_id, audience);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                debug!("cannot read token cache file {}: {}", path.display(), e);
                return None;
            }
        };

        let token: Token = match serde_json::from_str(&raw) {
            Ok(token) => token,
            Err(e) => {
                warn!("discarding malformed token cache file {}: {}", path.display(), e);
                return None;
            }
        };

        if token.is_expired() {
            debug!("cached token for '{}' in {} is expired", audience, path.display());
            return None;
        }
        Some(token)
    }

    /// Persist a token. Failures are logged and swallowed.
    pub async fn write(&self, client_id: &str, audience: Audience, token: &Token) {
        let path = self.token_file(client_id, audience);
        match serde_json::to_string(token) {
            Ok(json) => {
                if let Err(e) = tokio::fs::write(&path, json).await {
                    warn!("error writing OAuth token to file {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                warn!("error serializing OAuth token for {}: {}", path.display(), e);
            }
        }
    }
}

fn unusable_dir(dir: &Path, err: &std::io::Error) -> OAuthError {
    OAuthError::Configuration(format!(
        "cannot write to OAuth cache dir {}: {} \
         (if you are running on AWS Lambda, set HOME to /tmp)",
        dir.display(),
        err
    ))
}
