// tests/common/mod.rs
pub use serde_json::json;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use std::path::PathBuf;

use crate::provider::OAuthProviderConfig;

pub const TOKEN_PATH: &str = "/oauth/token";
pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_USER_AGENT: &str = "camunda-oauth-rust/0.1.0 test";

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Provider config pointing at a mock token endpoint.
pub fn test_config(
    auth_server_url: String,
    cache_dir: Option<PathBuf>,
    cache_on_disk: bool,
) -> OAuthProviderConfig {
    OAuthProviderConfig {
        auth_server_url,
        audience: "test.zeebe.camunda.io".to_owned(),
        client_id: TEST_CLIENT_ID.to_owned(),
        client_secret: "test-secret".to_owned(),
        user_agent: TEST_USER_AGENT.to_owned(),
        cache_dir,
        cache_on_disk,
    }
}

/// Mock a token endpoint that always issues the same token.
pub fn mock_token_endpoint<'a>(
    server: &'a MockServer,
    access_token: &str,
    expires_in: u64,
) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST).path(TOKEN_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "access_token": access_token,
                "scope": "camunda",
                "expires_in": expires_in,
                "token_type": "Bearer",
            }));
    })
}

/// Remove every environment variable this crate reads, so env tests start
/// from a clean slate. Callers must be `#[serial]`.
pub fn clear_camunda_env() {
    use crate::credentials::*;
    for key in [
        ZEEBE_CLIENT_ID,
        ZEEBE_CLIENT_SECRET,
        ZEEBE_ADDRESS,
        ZEEBE_AUTHORIZATION_SERVER_URL,
        ZEEBE_TOKEN_AUDIENCE,
        CAMUNDA_OAUTH_URL,
        CAMUNDA_CONSOLE_CLIENT_ID,
        CAMUNDA_CONSOLE_CLIENT_SECRET,
        CAMUNDA_TOKEN_CACHE_DIR,
        CAMUNDA_TOKEN_CACHE,
    ] {
        std::env::remove_var(key);
    }
}
