use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Access token as issued by the token endpoint.
///
/// The same record is used for the wire payload and for the disk cache
/// entry: the endpoint reports a relative `expires_in`, the provider stamps
/// the absolute `expiry` (epoch milliseconds) at issuance so cached entries
/// are self-describing. A token is never mutated after issuance; a refresh
/// replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    /// Some identity providers omit the scope.
    #[serde(default)]
    pub scope: String,
    /// Validity in seconds, relative to issuance.
    pub expires_in: u64,
    pub token_type: String,
    /// Absolute expiry, epoch milliseconds. Zero on the raw wire payload.
    #[serde(default)]
    pub expiry: i64,
    /// Symbolic audience the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

impl Token {
    /// Stamp the absolute expiry from `expires_in`, relative to now.
    pub fn stamp_expiry(&mut self) {
        self.expiry = now_millis() + self.expires_in as i64 * 1000;
    }

    pub fn is_expired(&self) -> bool {
        self.expiry <= now_millis()
    }

    /// Milliseconds until expiry; non-positive when already expired.
    pub fn remaining_millis(&self) -> i64 {
        self.expiry - now_millis()
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
