//! Session token and password helpers.
//!
//! The session token is base64-encoded JSON `{userId, exp, iat}`. It is a
//! shape contract for clients, not a signature: anyone can forge one.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const PASSWORD_SALT: &str = "growtree_salt";

/// Token lifetime
pub const SESSION_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub user_id: String,
    /// Expiry, epoch millis
    pub exp: i64,
    /// Issued at, epoch millis
    pub iat: i64,
}

impl SessionToken {
    pub fn issue(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            exp: (now + Duration::days(SESSION_LIFETIME_DAYS)).timestamp_millis(),
            iat: now.timestamp_millis(),
        }
    }

    pub fn encode(&self) -> String {
        // Serializing a struct of strings and integers cannot fail
        let payload = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(payload)
    }

    /// Decode a token, `None` if it is not base64 JSON of the right shape
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = STANDARD.decode(token.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp_millis()
    }
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(PASSWORD_SALT.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    hash_password(password) == hashed
}
