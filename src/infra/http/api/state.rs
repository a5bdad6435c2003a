use std::sync::Arc;

use crate::application::api_keys::ApiKeyService;
use crate::application::listing::CachedListService;
use crate::application::repos::{HealthRepo, RecordsRepo};
use crate::domain::entities::{InstitutionRecord, MetadataRecord, ReportRecord};

#[derive(Clone)]
pub struct ApiState {
    pub api_keys: Arc<ApiKeyService>,
    pub lists: Arc<CachedListService>,
    pub institutions: Arc<dyn RecordsRepo<InstitutionRecord>>,
    pub reports: Arc<dyn RecordsRepo<ReportRecord>>,
    pub metadata: Arc<dyn RecordsRepo<MetadataRecord>>,
    pub health: Arc<dyn HealthRepo>,
}
