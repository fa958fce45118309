use thiserror::Error;

/// Errors surfaced by the provider.
///
/// `Configuration` is fatal and only raised at construction time.
/// `UnknownAudience` is a caller error raised before any I/O.
/// `Exchange` covers every way a credential exchange can fail; it is the
/// only class that feeds the provider's backoff counter.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth configuration error: {0}")]
    Configuration(String),

    #[error("unknown token audience '{0}'")]
    UnknownAudience(String),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// Failure modes of a single client-credentials exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Transport-level failure, including a timed-out request.
    #[error("token endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("token endpoint rejected the credential exchange: {0}")]
    Rejected(reqwest::StatusCode),

    /// The response body was not a well-formed token payload.
    #[error("token endpoint returned a malformed body: {0}")]
    Malformed(#[source] serde_json::Error),
}
