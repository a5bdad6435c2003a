//! Postgres-backed repository implementations.

mod api_keys;
mod records;
mod util;

pub use util::map_sqlx_error;

use std::{str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::{HealthRepo, RepoError};

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a pool whose sessions abort statements running past `statement_timeout`.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        statement_timeout: Duration,
    ) -> Result<PgPool, sqlx::Error> {
        let timeout_ms = statement_timeout.as_millis().to_string();
        let options = PgConnectOptions::from_str(url)?
            .options([("statement_timeout", timeout_ms.as_str())]);

        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl HealthRepo for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}
