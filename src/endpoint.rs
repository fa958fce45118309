use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::ExchangeError;
use crate::token::Token;

/// A hung exchange only blocks the callers waiting on it, so the bound can
/// be generous; a timeout surfaces as `ExchangeError::Unreachable`.
pub const EXCHANGE_TIMEOUT_MS: u64 = 10_000;

/// Performs a single client-credentials grant against the token endpoint.
///
/// No retries here: backoff and re-attempts are entirely the provider's
/// responsibility. The returned payload carries the endpoint-reported
/// `expires_in`; the provider alone stamps the absolute expiry.
#[derive(Debug, Clone)]
pub struct TokenEndpoint {
    url: String,
    user_agent: String,
    client: Client,
}

impl TokenEndpoint {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(EXCHANGE_TIMEOUT_MS))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
            client,
        }
    }

    pub async fn exchange(
        &self,
        client_id: &str,
        client_secret: &str,
        audience: &str,
    ) -> Result<Token, ExchangeError> {
        let mut form = HashMap::new();
        form.insert("audience", audience);
        form.insert("client_id", client_id);
        form.insert("client_secret", client_secret);
        form.insert("grant_type", "client_credentials");

        debug!("requesting token for audience '{}' from {}", audience, self.url);
        let response = self
            .client
            .post(&self.url)
            .header("user-agent", &self.user_agent)
            .form(&form)
            .send()
            .await
            .map_err(ExchangeError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Rejected(status));
        }

        let body = response.text().await.map_err(ExchangeError::Unreachable)?;
        serde_json::from_str::<Token>(&body).map_err(ExchangeError::Malformed)
    }
}
