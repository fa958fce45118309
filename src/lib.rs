//! # Camunda OAuth Token Library
//!
//! Issues and caches OAuth2 client-credentials access tokens for the
//! Camunda SaaS audiences (OPERATE, ZEEBE, OPTIMIZE, TASKLIST, CONSOLE).
//! Tokens are cached in two tiers (in-process map plus on-disk files) and
//! are never served past their expiry.
//!
//! Modules:
//! - `provider` — the token cache engine and its configuration
//! - `cache` — in-memory and on-disk token tiers
//! - `endpoint` — the client-credentials exchange against the token endpoint
//! - `audience` — symbolic audience names and their resolution
//! - `credentials` — credential and cache-setting discovery from the environment
//! - `registry` — one lazily built provider per audience

pub mod audience;
pub mod cache;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod provider;
pub mod registry;
pub mod token;

#[cfg(test)]
pub mod tests;

pub use crate::audience::Audience;
pub use crate::error::{ExchangeError, OAuthError};
pub use crate::provider::{OAuthProvider, OAuthProviderConfig};
pub use crate::registry::ProviderRegistry;
pub use crate::token::Token;
