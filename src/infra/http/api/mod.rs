pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod views;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

pub const INSTITUTION_TRADE_PATH: &str = "/get-institution-trade";
pub const SUBSECTOR_REPORTS_PATH: &str = "/get-subsector-reports";
pub const METADATA_PATH: &str = "/get-metadata";

/// List endpoints, all behind API key authentication.
pub fn build_api_router(state: ApiState) -> Router<ApiState> {
    Router::new()
        .route(INSTITUTION_TRADE_PATH, get(handlers::institution_trade))
        .route(SUBSECTOR_REPORTS_PATH, get(handlers::subsector_reports))
        .route(METADATA_PATH, get(handlers::metadata))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::api_auth,
        ))
}
