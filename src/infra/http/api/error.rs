use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::application::listing::ListError;
use crate::application::repos::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const EXPIRED: &str = "expired";
    pub const REVOKED: &str = "revoked";
    pub const NOT_FOUND: &str = "not_found";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
    pub const CACHE: &str = "cache_error";
    pub const SERIALIZATION: &str = "serialization_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            report: None,
        }
    }

    /// Replace the logged diagnostics with the full chain of `error`.
    pub fn with_source(mut self, source: &'static str, error: &dyn std::error::Error) -> Self {
        self.report = Some(ErrorReport::from_error(source, self.status, error));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "API key required",
            None,
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        let mapped = match &err {
            ListError::Repo(RepoError::Timeout) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
                "Database timeout",
                None,
            ),
            ListError::Repo(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
                "Persistence error",
                None,
            ),
            ListError::Cache(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::CACHE,
                "Cache unavailable",
                None,
            ),
            ListError::Serialize(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::SERIALIZATION,
                "Response could not be encoded",
                None,
            ),
        };
        mapped.with_source("application::listing", &err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message(
                "infra::http::api",
                self.status,
                format!(
                    "{}: {}",
                    self.code,
                    self.hint.as_deref().unwrap_or(self.message)
                ),
            )
        });
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::CacheError;

    use super::*;

    #[test]
    fn list_errors_map_to_documented_codes() {
        let cases = [
            (
                ListError::Repo(RepoError::Timeout),
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
            ),
            (
                ListError::Repo(RepoError::from_persistence("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REPO,
            ),
            (
                ListError::Cache(CacheError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::CACHE,
            ),
        ];

        for (err, status, code) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn response_carries_report_with_source_chain() {
        let response =
            ApiError::from(ListError::Repo(RepoError::from_persistence("connection reset")))
                .into_response();
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.source, "application::listing");
        assert!(
            report
                .messages
                .iter()
                .any(|message| message.contains("connection reset"))
        );
    }
}
