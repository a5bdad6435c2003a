use sqlx::{query, query_as};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ApiKeysRepo, CreateApiKeyParams, RepoError};
use crate::domain::api_keys::ApiKeyRecord;

use super::{PostgresRepositories, map_sqlx_error};

const API_KEY_COLUMNS: &str = "id, name, description, prefix, hashed_secret, expires_at, \
     revoked_at, last_used_at, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    prefix: String,
    hashed_secret: Vec<u8>,
    expires_at: Option<OffsetDateTime>,
    revoked_at: Option<OffsetDateTime>,
    last_used_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
}

impl From<ApiKeyRow> for ApiKeyRecord {
    fn from(row: ApiKeyRow) -> Self {
        ApiKeyRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            prefix: row.prefix,
            hashed_secret: row.hashed_secret,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
            last_used_at: row.last_used_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait::async_trait]
impl ApiKeysRepo for PostgresRepositories {
    async fn create_key(&self, params: CreateApiKeyParams) -> Result<ApiKeyRecord, RepoError> {
        let sql = format!(
            "INSERT INTO api_keys (id, name, description, prefix, hashed_secret, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {API_KEY_COLUMNS}"
        );
        let row = query_as::<_, ApiKeyRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(params.name)
            .bind(params.description)
            .bind(params.prefix)
            .bind(params.hashed_secret)
            .bind(params.expires_at)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_keys(&self) -> Result<Vec<ApiKeyRecord>, RepoError> {
        let sql = format!("SELECT {API_KEY_COLUMNS} FROM api_keys ORDER BY created_at DESC, id DESC");
        let rows = query_as::<_, ApiKeyRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ApiKeyRecord::from).collect())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<ApiKeyRecord>, RepoError> {
        let sql = format!("SELECT {API_KEY_COLUMNS} FROM api_keys WHERE prefix = $1");
        let row = query_as::<_, ApiKeyRow>(&sql)
            .bind(prefix)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ApiKeyRecord::from))
    }

    async fn revoke_key(&self, id: Uuid, revoked_at: OffsetDateTime) -> Result<(), RepoError> {
        let result = query("UPDATE api_keys SET revoked_at = COALESCE(revoked_at, $1) WHERE id = $2")
            .bind(revoked_at)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn update_last_used(
        &self,
        id: Uuid,
        last_used_at: OffsetDateTime,
    ) -> Result<(), RepoError> {
        query("UPDATE api_keys SET last_used_at = $1 WHERE id = $2")
            .bind(last_used_at)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
