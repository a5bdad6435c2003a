//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::api_keys::ApiKeyRecord;
use crate::domain::filter::{FilterableRecord, Predicate};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Read-only access to one resource collection.
///
/// Implementations return every record satisfying `predicate` in the store's
/// natural order.
#[async_trait]
pub trait RecordsRepo<R>: Send + Sync
where
    R: FilterableRecord,
{
    async fn query(&self, predicate: &Predicate<R::Field>) -> Result<Vec<R>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateApiKeyParams {
    pub name: String,
    pub description: Option<String>,
    pub prefix: String,
    pub hashed_secret: Vec<u8>,
    pub expires_at: Option<OffsetDateTime>,
}

#[async_trait]
pub trait ApiKeysRepo: Send + Sync {
    async fn create_key(&self, params: CreateApiKeyParams) -> Result<ApiKeyRecord, RepoError>;

    async fn list_keys(&self) -> Result<Vec<ApiKeyRecord>, RepoError>;

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<ApiKeyRecord>, RepoError>;

    async fn revoke_key(&self, id: Uuid, revoked_at: OffsetDateTime) -> Result<(), RepoError>;

    async fn update_last_used(
        &self,
        id: Uuid,
        last_used_at: OffsetDateTime,
    ) -> Result<(), RepoError>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
