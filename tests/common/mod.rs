#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use bytes::Bytes;
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use sectorboard::application::api_keys::{ApiKeyService, IssueApiKeyCommand};
use sectorboard::application::listing::CachedListService;
use sectorboard::application::repos::{
    ApiKeysRepo, CreateApiKeyParams, HealthRepo, RecordsRepo, RepoError,
};
use sectorboard::cache::{CacheConfig, CacheError, CacheStore, MemoryCacheStore};
use sectorboard::domain::api_keys::ApiKeyRecord;
use sectorboard::domain::entities::{InstitutionRecord, MetadataRecord, ReportRecord};
use sectorboard::domain::filter::{FilterableRecord, Predicate};
use sectorboard::infra::http::{ApiState, build_router};

/// In-memory records store that counts how often it is queried.
pub struct SpyRepo<R> {
    records: Vec<R>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl<R> SpyRepo<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl<R> RecordsRepo<R> for SpyRepo<R>
where
    R: FilterableRecord + Clone + Send + Sync + 'static,
{
    async fn query(&self, predicate: &Predicate<R::Field>) -> Result<Vec<R>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection reset by peer"));
        }
        Ok(self
            .records
            .iter()
            .filter(|record| predicate.matches(*record))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryKeysRepo {
    keys: Mutex<Vec<ApiKeyRecord>>,
}

#[async_trait]
impl ApiKeysRepo for MemoryKeysRepo {
    async fn create_key(&self, params: CreateApiKeyParams) -> Result<ApiKeyRecord, RepoError> {
        let record = ApiKeyRecord {
            id: Uuid::new_v4(),
            name: params.name,
            description: params.description,
            prefix: params.prefix,
            hashed_secret: params.hashed_secret,
            expires_at: params.expires_at,
            revoked_at: None,
            last_used_at: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.keys.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_keys(&self) -> Result<Vec<ApiKeyRecord>, RepoError> {
        Ok(self.keys.lock().await.clone())
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<ApiKeyRecord>, RepoError> {
        Ok(self
            .keys
            .lock()
            .await
            .iter()
            .find(|key| key.prefix == prefix)
            .cloned())
    }

    async fn revoke_key(&self, id: Uuid, revoked_at: OffsetDateTime) -> Result<(), RepoError> {
        let mut keys = self.keys.lock().await;
        let key = keys
            .iter_mut()
            .find(|key| key.id == id)
            .ok_or(RepoError::NotFound)?;
        key.revoked_at = Some(revoked_at);
        Ok(())
    }

    async fn update_last_used(
        &self,
        id: Uuid,
        last_used_at: OffsetDateTime,
    ) -> Result<(), RepoError> {
        if let Some(key) = self.keys.lock().await.iter_mut().find(|key| key.id == id) {
            key.last_used_at = Some(last_used_at);
        }
        Ok(())
    }
}

/// Cache store whose backend is unreachable.
pub struct UnavailableCache;

#[async_trait]
impl CacheStore for UnavailableCache {
    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _payload: Bytes, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

pub struct StubHealth {
    pub healthy: bool,
}

#[async_trait]
impl HealthRepo for StubHealth {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.healthy {
            Ok(())
        } else {
            Err(RepoError::from_persistence("database unreachable"))
        }
    }
}

pub struct Harness {
    pub router: Router,
    pub token: String,
    pub api_keys: Arc<ApiKeyService>,
    pub cache: Arc<MemoryCacheStore>,
    pub institutions: Arc<SpyRepo<InstitutionRecord>>,
    pub reports: Arc<SpyRepo<ReportRecord>>,
    pub metadata: Arc<SpyRepo<MetadataRecord>>,
}

pub struct Fixtures {
    pub institutions: Vec<InstitutionRecord>,
    pub reports: Vec<ReportRecord>,
    pub metadata: Vec<MetadataRecord>,
    pub healthy: bool,
    /// Replaces the in-memory store behind the list service.
    pub cache: Option<Arc<dyn CacheStore>>,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            institutions: sample_institutions(),
            reports: sample_reports(),
            metadata: sample_metadata(),
            healthy: true,
            cache: None,
        }
    }
}

pub async fn harness(fixtures: Fixtures) -> Harness {
    let api_keys = Arc::new(ApiKeyService::new(Arc::new(MemoryKeysRepo::default())));
    let issued = api_keys
        .issue(IssueApiKeyCommand {
            name: "integration".to_string(),
            description: None,
            expires_at: None,
        })
        .await
        .expect("issue api key");

    let cache = Arc::new(MemoryCacheStore::new());
    let institutions = Arc::new(SpyRepo::new(fixtures.institutions));
    let reports = Arc::new(SpyRepo::new(fixtures.reports));
    let metadata = Arc::new(SpyRepo::new(fixtures.metadata));

    let state = ApiState {
        api_keys: api_keys.clone(),
        lists: Arc::new(CachedListService::new(
            fixtures
                .cache
                .unwrap_or_else(|| cache.clone() as Arc<dyn CacheStore>),
            &CacheConfig::default(),
        )),
        institutions: institutions.clone(),
        reports: reports.clone(),
        metadata: metadata.clone(),
        health: Arc::new(StubHealth {
            healthy: fixtures.healthy,
        }),
    };

    Harness {
        router: build_router(state),
        token: issued.token,
        api_keys,
        cache,
        institutions,
        reports,
        metadata,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be json")
}

pub fn sample_institutions() -> Vec<InstitutionRecord> {
    vec![
        InstitutionRecord {
            id: 1,
            symbol: "BBCA".to_string(),
            top_sellers: "Vanguard Group".to_string(),
            top_buyers: "BlackRock".to_string(),
        },
        InstitutionRecord {
            id: 2,
            symbol: "BBRI".to_string(),
            top_sellers: "Fidelity".to_string(),
            top_buyers: "Vanguard Total Market".to_string(),
        },
        InstitutionRecord {
            id: 3,
            symbol: "TLKM".to_string(),
            top_sellers: "State Street".to_string(),
            top_buyers: "Norges Bank".to_string(),
        },
    ]
}

pub fn sample_reports() -> Vec<ReportRecord> {
    vec![
        ReportRecord {
            id: 1,
            sub_sector: "Banks".to_string(),
            report: "Net interest margins widened.".to_string(),
        },
        ReportRecord {
            id: 2,
            sub_sector: "Telecommunication".to_string(),
            report: "Tower leasing demand is flat.".to_string(),
        },
    ]
}

pub fn sample_metadata() -> Vec<MetadataRecord> {
    vec![
        MetadataRecord {
            id: 1,
            sector: "Finance".to_string(),
            sub_sector: "Banks".to_string(),
        },
        MetadataRecord {
            id: 2,
            sector: "Finance".to_string(),
            sub_sector: "Insurance".to_string(),
        },
    ]
}
