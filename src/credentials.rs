//! Credential and cache-setting discovery from the process environment.

use std::env;
use std::path::PathBuf;

use crate::error::OAuthError;

pub const ZEEBE_CLIENT_ID: &str = "ZEEBE_CLIENT_ID";
pub const ZEEBE_CLIENT_SECRET: &str = "ZEEBE_CLIENT_SECRET";
pub const ZEEBE_ADDRESS: &str = "ZEEBE_ADDRESS";
pub const ZEEBE_AUTHORIZATION_SERVER_URL: &str = "ZEEBE_AUTHORIZATION_SERVER_URL";
pub const ZEEBE_TOKEN_AUDIENCE: &str = "ZEEBE_TOKEN_AUDIENCE";
pub const CAMUNDA_OAUTH_URL: &str = "CAMUNDA_OAUTH_URL";
pub const CAMUNDA_CONSOLE_CLIENT_ID: &str = "CAMUNDA_CONSOLE_CLIENT_ID";
pub const CAMUNDA_CONSOLE_CLIENT_SECRET: &str = "CAMUNDA_CONSOLE_CLIENT_SECRET";

/// Overrides the token cache directory (default `$HOME/.camunda`).
pub const CAMUNDA_TOKEN_CACHE_DIR: &str = "CAMUNDA_TOKEN_CACHE_DIR";
/// Set to `memory-only` to disable the disk tier entirely.
pub const CAMUNDA_TOKEN_CACHE: &str = "CAMUNDA_TOKEN_CACHE";
pub const MEMORY_ONLY: &str = "memory-only";

/// Client identity for the worker audiences (OPERATE, ZEEBE, OPTIMIZE,
/// TASKLIST), as provisioned for a Zeebe client.
#[derive(Debug, Clone)]
pub struct ZeebeCredentials {
    pub auth_server_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Gateway address, e.g. `my-cluster.zeebe.camunda.io:443`.
    pub zeebe_address: String,
    /// Explicit audience override, when provisioned.
    pub token_audience: Option<String>,
}

impl ZeebeCredentials {
    /// Audience for ZEEBE grants: the explicit override when present,
    /// otherwise the gateway address with a trailing `:443` stripped.
    pub fn audience(&self) -> String {
        if let Some(audience) = &self.token_audience {
            return audience.clone();
        }
        let address = self.zeebe_address.as_str();
        address.strip_suffix(":443").unwrap_or(address).to_owned()
    }
}

/// Client identity for the CONSOLE audience.
#[derive(Debug, Clone)]
pub struct ConsoleCredentials {
    pub auth_server_url: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Discover the Zeebe client credentials. Anything short of a complete
/// tuple is a fatal configuration error.
pub fn zeebe_credentials_from_env() -> Result<ZeebeCredentials, OAuthError> {
    let client_id = env::var(ZEEBE_CLIENT_ID).ok();
    let client_secret = env::var(ZEEBE_CLIENT_SECRET).ok();
    let zeebe_address = env::var(ZEEBE_ADDRESS).ok();
    let auth_server_url = env::var(ZEEBE_AUTHORIZATION_SERVER_URL)
        .or_else(|_| env::var(CAMUNDA_OAUTH_URL))
        .ok();

    match (client_id, client_secret, zeebe_address, auth_server_url) {
        (Some(client_id), Some(client_secret), Some(zeebe_address), Some(auth_server_url)) => {
            Ok(ZeebeCredentials {
                auth_server_url,
                client_id,
                client_secret,
                zeebe_address,
                token_audience: env::var(ZEEBE_TOKEN_AUDIENCE).ok(),
            })
        }
        _ => Err(OAuthError::Configuration(
            "complete Zeebe credentials not found in environment".to_owned(),
        )),
    }
}

/// Discover the Console client credentials.
pub fn console_credentials_from_env() -> Result<ConsoleCredentials, OAuthError> {
    let client_id = env::var(CAMUNDA_CONSOLE_CLIENT_ID).ok();
    let client_secret = env::var(CAMUNDA_CONSOLE_CLIENT_SECRET).ok();
    let auth_server_url = env::var(CAMUNDA_OAUTH_URL).ok();

    match (client_id, client_secret, auth_server_url) {
        (Some(client_id), Some(client_secret), Some(auth_server_url)) => Ok(ConsoleCredentials {
            auth_server_url,
            client_id,
            client_secret,
        }),
        _ => Err(OAuthError::Configuration(
            "complete Console credentials not found in environment".to_owned(),
        )),
    }
}

/// Token cache directory: `CAMUNDA_TOKEN_CACHE_DIR`, falling back to
/// `.camunda` under the home directory.
pub fn cache_dir_from_env() -> PathBuf {
    env::var_os(CAMUNDA_TOKEN_CACHE_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(default_cache_dir)
}

/// True when `CAMUNDA_TOKEN_CACHE=memory-only` disables the disk tier.
pub fn file_cache_disabled_by_env() -> bool {
    env::var(CAMUNDA_TOKEN_CACHE)
        .map(|value| value == MEMORY_ONLY)
        .unwrap_or(false)
}

fn default_cache_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".camunda")
}
