//! Domain types for API keys.

use std::fmt::{Display, Formatter};
use time::OffsetDateTime;
use uuid::Uuid;

/// Status of an API key, derived from its timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyStatus {
    Active,
    Revoked,
    Expired,
}

impl ApiKeyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

impl Display for ApiKeyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiKeyRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub prefix: String,
    pub hashed_secret: Vec<u8>,
    pub expires_at: Option<OffsetDateTime>,
    pub revoked_at: Option<OffsetDateTime>,
    pub last_used_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl ApiKeyRecord {
    /// Revocation takes precedence over expiry.
    pub fn status_at(&self, now: OffsetDateTime) -> ApiKeyStatus {
        if self.revoked_at.is_some_and(|revoked_at| revoked_at <= now) {
            return ApiKeyStatus::Revoked;
        }
        if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return ApiKeyStatus::Expired;
        }
        ApiKeyStatus::Active
    }
}
