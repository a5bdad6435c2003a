use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::api_keys::ApiAuthError;

use super::error::{ApiError, codes};
use super::state::ApiState;

const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests without a valid API key before any handler runs.
pub async fn api_auth(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers()) {
        Some(value) => value,
        None => return auth_error(ApiAuthError::Missing).into_response(),
    };

    let principal = match state.api_keys.authenticate(&token).await {
        Ok(principal) => principal,
        Err(err) => return auth_error(err).into_response(),
    };

    request.extensions_mut().insert(principal.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

fn auth_error(err: ApiAuthError) -> ApiError {
    let api_error = match err {
        ApiAuthError::Missing | ApiAuthError::Invalid => ApiError::unauthorized(),
        ApiAuthError::Expired => {
            ApiError::new(StatusCode::UNAUTHORIZED, codes::EXPIRED, "API key expired", None)
        }
        ApiAuthError::Revoked => {
            ApiError::new(StatusCode::UNAUTHORIZED, codes::REVOKED, "API key revoked", None)
        }
    };
    api_error.with_source("infra::http::api::auth", &err)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.strip_prefix("Bearer "));

    bearer
        .or_else(|| {
            headers
                .get(API_KEY_HEADER)
                .and_then(|value| value.to_str().ok())
        })
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
