pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;

use self::middleware::{log_responses, set_request_context};

pub const DB_HEALTH_PATH: &str = "/_health/db";

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn db_health(State(state): State<ApiState>) -> Response {
    db_health_response(state.health.ping().await)
}

/// Full application router: list API, health probe and request logging.
pub fn build_router(state: ApiState) -> Router {
    build_api_router(state.clone())
        .route(DB_HEALTH_PATH, get(db_health))
        .fallback(api::handlers::not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
