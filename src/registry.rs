use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::audience::{Audience, CONSOLE_AUDIENCE};
use crate::credentials;
use crate::error::OAuthError;
use crate::provider::{OAuthProvider, OAuthProviderConfig};

/// One lazily constructed provider per audience, all discovered from the
/// environment: the Console client pair serves CONSOLE, the Zeebe client
/// pair serves the worker audiences.
///
/// An explicitly owned registry instead of hidden per-module singletons,
/// so tests and embedders control its lifetime.
pub struct ProviderRegistry {
    user_agent: String,
    providers: RwLock<HashMap<Audience, Arc<OAuthProvider>>>,
}

impl ProviderRegistry {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            providers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_token(&self, audience: Audience) -> Result<String, OAuthError> {
        let provider = self.provider(audience).await?;
        provider.token_for(audience).await
    }

    /// The provider serving an audience, built on first use.
    pub async fn provider(&self, audience: Audience) -> Result<Arc<OAuthProvider>, OAuthError> {
        if let Some(provider) = self.providers.read().await.get(&audience) {
            return Ok(provider.clone());
        }

        let mut providers = self.providers.write().await;
        // Racing builders: the first writer wins.
        if let Some(provider) = providers.get(&audience) {
            return Ok(provider.clone());
        }
        info!("building OAuth provider for audience '{}'", audience);
        let provider = Arc::new(self.build(audience)?);
        providers.insert(audience, provider.clone());
        Ok(provider)
    }

    fn build(&self, audience: Audience) -> Result<OAuthProvider, OAuthError> {
        match audience {
            Audience::Console => {
                let creds = credentials::console_credentials_from_env()?;
                OAuthProvider::new(OAuthProviderConfig {
                    auth_server_url: creds.auth_server_url,
                    audience: CONSOLE_AUDIENCE.to_owned(),
                    client_id: creds.client_id,
                    client_secret: creds.client_secret,
                    user_agent: self.user_agent.clone(),
                    cache_dir: None,
                    cache_on_disk: true,
                })
            }
            _ => OAuthProvider::from_env(self.user_agent.clone()),
        }
    }
}
