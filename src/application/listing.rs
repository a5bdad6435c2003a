//! Cached list retrieval shared by every resource view.
//!
//! A [`ListView`] names a resource (its identity doubles as the cache namespace),
//! builds the predicate for a request and maps records to their public shape.
//! [`CachedListService::retrieve`] applies cache-aside on top of it: a hit returns
//! the stored payload untouched, a miss queries the store, serializes the result
//! and stores it for the configured TTL. Writes to the store are therefore visible
//! only after the entry expires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use metrics::{counter, histogram};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::cache::{CacheConfig, CacheError, CacheStore, list_cache_key};
use crate::domain::filter::{FilterableRecord, Predicate};

use super::query::QueryParams;
use super::repos::{RecordsRepo, RepoError};

pub const METRIC_LIST_CACHE_HIT: &str = "sectorboard_list_cache_hit_total";
pub const METRIC_LIST_CACHE_MISS: &str = "sectorboard_list_cache_miss_total";
pub const METRIC_LIST_QUERY_MS: &str = "sectorboard_list_query_ms";

/// Static description of one list endpoint.
pub struct ListView<R, P>
where
    R: FilterableRecord,
{
    pub identity: &'static str,
    pub filter: fn(&QueryParams) -> Predicate<R::Field>,
    pub present: fn(&R) -> P,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("failed to serialize list payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct CachedListService {
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CachedListService {
    pub fn new(cache: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            cache,
            ttl: config.ttl,
        }
    }

    /// Return the serialized list for `view`, consulting the cache first.
    ///
    /// Store and cache failures propagate unchanged; a failed query leaves the
    /// cache untouched.
    #[instrument(skip_all, fields(view = view.identity))]
    pub async fn retrieve<R, P>(
        &self,
        view: &ListView<R, P>,
        repo: &dyn RecordsRepo<R>,
        params: &QueryParams,
    ) -> Result<Bytes, ListError>
    where
        R: FilterableRecord + Send + Sync,
        P: Serialize,
    {
        let key = list_cache_key(view.identity, params);

        if let Some(payload) = self.cache.get(&key).await? {
            counter!(METRIC_LIST_CACHE_HIT, "view" => view.identity).increment(1);
            debug!(cache = "list", outcome = "hit", key = %key, "serving cached list");
            return Ok(payload);
        }

        counter!(METRIC_LIST_CACHE_MISS, "view" => view.identity).increment(1);
        info!(cache = "list", outcome = "miss", key = %key, "querying store");

        let predicate = (view.filter)(params);
        let started_at = Instant::now();
        let records = repo.query(&predicate).await?;
        histogram!(METRIC_LIST_QUERY_MS, "view" => view.identity)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        let count = records.len();
        let payload = {
            let items: Vec<P> = records.iter().map(view.present).collect();
            Bytes::from(serde_json::to_vec(&items)?)
        };

        self.cache.set(&key, payload.clone(), self.ttl).await?;
        info!(
            cache = "list",
            key = %key,
            records = count,
            ttl_secs = self.ttl.as_secs(),
            "list cached"
        );

        Ok(payload)
    }
}
