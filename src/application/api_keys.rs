use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{ApiKeysRepo, CreateApiKeyParams, RepoError};
use crate::domain::api_keys::{ApiKeyRecord, ApiKeyStatus};

const TOKEN_PREFIX: &str = "sk";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ApiKeyError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("key name must not be empty")]
    EmptyName,
    #[error("key not found")]
    NotFound,
}

#[derive(Debug, Error)]
pub enum ApiAuthError {
    #[error("missing api key")]
    Missing,
    #[error("invalid api key")]
    Invalid,
    #[error("expired api key")]
    Expired,
    #[error("revoked api key")]
    Revoked,
}

#[derive(Debug, Clone)]
pub struct IssueApiKeyCommand {
    pub name: String,
    pub description: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct ApiKeyIssued {
    pub record: ApiKeyRecord,
    pub token: String,
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct ApiPrincipal {
    pub key_id: Uuid,
    pub name: String,
    pub prefix: String,
}

#[derive(Clone)]
pub struct ApiKeyService {
    repo: Arc<dyn ApiKeysRepo>,
}

impl ApiKeyService {
    pub fn new(repo: Arc<dyn ApiKeysRepo>) -> Self {
        Self { repo }
    }

    pub async fn issue(&self, cmd: IssueApiKeyCommand) -> Result<ApiKeyIssued, ApiKeyError> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(ApiKeyError::EmptyName);
        }

        let prefix = Self::generate_prefix();
        let secret = Self::generate_secret();
        let token = format!("{TOKEN_PREFIX}_{prefix}_{secret}");
        let hashed_secret = Self::hash_secret(&secret);

        let record = self
            .repo
            .create_key(CreateApiKeyParams {
                name: name.to_string(),
                description: cmd.description,
                prefix,
                hashed_secret,
                expires_at: cmd.expires_at,
            })
            .await?;

        Ok(ApiKeyIssued { record, token })
    }

    pub async fn revoke(&self, id: Uuid) -> Result<(), ApiKeyError> {
        let now = OffsetDateTime::now_utc();
        self.repo.revoke_key(id, now).await.map_err(|err| match err {
            RepoError::NotFound => ApiKeyError::NotFound,
            other => ApiKeyError::Repo(other),
        })
    }

    pub async fn list(&self) -> Result<Vec<ApiKeyRecord>, ApiKeyError> {
        self.repo.list_keys().await.map_err(ApiKeyError::from)
    }

    pub async fn authenticate(&self, token: &str) -> Result<ApiPrincipal, ApiAuthError> {
        let parsed = Self::parse_token(token).ok_or(ApiAuthError::Invalid)?;
        let record = self
            .repo
            .find_by_prefix(&parsed.prefix)
            .await
            .map_err(|_| ApiAuthError::Invalid)?
            .ok_or(ApiAuthError::Invalid)?;

        let now = OffsetDateTime::now_utc();
        match record.status_at(now) {
            ApiKeyStatus::Revoked => return Err(ApiAuthError::Revoked),
            ApiKeyStatus::Expired => return Err(ApiAuthError::Expired),
            ApiKeyStatus::Active => {}
        }

        let hashed_input = Self::hash_secret(&parsed.secret);
        if record.hashed_secret.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(ApiAuthError::Invalid);
        }

        // best-effort last_used update; do not block auth
        let repo = self.repo.clone();
        let key_id = record.id;
        tokio::spawn(async move {
            if let Err(err) = repo.update_last_used(key_id, now).await {
                warn!(
                    target = "sectorboard::api_keys",
                    key_id = %key_id,
                    error = %err,
                    "failed to record api key usage"
                );
            }
        });

        Ok(ApiPrincipal {
            key_id: record.id,
            name: record.name,
            prefix: record.prefix,
        })
    }

    fn hash_secret(secret: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.finalize().to_vec()
    }

    fn generate_prefix() -> String {
        Uuid::new_v4().simple().to_string()[..12].to_string()
    }

    fn generate_secret() -> String {
        format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
    }

    fn parse_token(token: &str) -> Option<ParsedToken> {
        let mut parts = token.splitn(3, '_');
        let prefix_tag = parts.next()?;
        if prefix_tag != TOKEN_PREFIX {
            return None;
        }
        let prefix = parts.next()?;
        let secret = parts.next()?;
        if secret.len() < MIN_SECRET_LEN || prefix.is_empty() {
            return None;
        }
        Some(ParsedToken {
            prefix: prefix.to_string(),
            secret: secret.to_string(),
        })
    }
}

struct ParsedToken {
    prefix: String,
    secret: String,
}
