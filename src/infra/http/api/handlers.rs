use axum::extract::{RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::listing::ListView;
use crate::application::query::QueryParams;
use crate::application::repos::RecordsRepo;
use crate::domain::filter::FilterableRecord;

use super::error::ApiError;
use super::state::ApiState;
use super::views::{INSTITUTIONS, METADATA, REPORTS};

const JSON_CONTENT_TYPE: &str = "application/json";

pub async fn institution_trade(
    State(state): State<ApiState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    list_response(&state, &INSTITUTIONS, state.institutions.as_ref(), query).await
}

pub async fn subsector_reports(
    State(state): State<ApiState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    list_response(&state, &REPORTS, state.reports.as_ref(), query).await
}

pub async fn metadata(
    State(state): State<ApiState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    list_response(&state, &METADATA, state.metadata.as_ref(), query).await
}

async fn list_response<R, P>(
    state: &ApiState,
    view: &ListView<R, P>,
    repo: &dyn RecordsRepo<R>,
    query: Option<String>,
) -> Result<Response, ApiError>
where
    R: FilterableRecord + Send + Sync,
    P: Serialize,
{
    let params = QueryParams::parse(query.as_deref());
    let payload = state.lists.retrieve(view, repo, &params).await?;
    Ok(([(CONTENT_TYPE, JSON_CONTENT_TYPE)], payload).into_response())
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint")
}
