use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{application::api_keys::ApiPrincipal, application::error::ErrorReport};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// Tag every request with an id, reusing a caller-supplied `x-request-id` when sane.
pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let ctx = RequestContext { request_id };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);
    response
}

/// Log 4xx/5xx responses together with the diagnostics handlers attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let failure = FailedRequest {
        status,
        method,
        uri,
        request_id,
        elapsed_ms: start.elapsed().as_millis(),
        // set by the auth layer, which runs inside this one
        principal: response.extensions().get::<ApiPrincipal>().cloned(),
        report: response.extensions_mut().remove::<ErrorReport>(),
    };
    failure.emit();

    response
}

struct FailedRequest {
    status: StatusCode,
    method: Method,
    uri: Uri,
    request_id: String,
    elapsed_ms: u128,
    principal: Option<ApiPrincipal>,
    report: Option<ErrorReport>,
}

impl FailedRequest {
    fn emit(self) {
        let (source, chain) = match self.report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let (api_key_id, api_key_prefix) = match &self.principal {
            Some(principal) => (principal.key_id.to_string(), principal.prefix.as_str()),
            None => (String::new(), ""),
        };
        let detail = chain
            .first()
            .map(String::as_str)
            .unwrap_or("no diagnostic available");

        if self.status.is_server_error() {
            error!(
                target = "sectorboard::http::response",
                status = self.status.as_u16(),
                method = %self.method,
                path = %self.uri.path(),
                query = self.uri.query().unwrap_or(""),
                elapsed_ms = self.elapsed_ms,
                source,
                detail,
                chain = ?chain,
                request_id = %self.request_id,
                api_key_id = %api_key_id,
                api_key_prefix,
                "request failed",
            );
        } else {
            warn!(
                target = "sectorboard::http::response",
                status = self.status.as_u16(),
                method = %self.method,
                path = %self.uri.path(),
                query = self.uri.query().unwrap_or(""),
                elapsed_ms = self.elapsed_ms,
                source,
                detail,
                chain = ?chain,
                request_id = %self.request_id,
                api_key_id = %api_key_id,
                api_key_prefix,
                "request rejected",
            );
        }
    }
}
