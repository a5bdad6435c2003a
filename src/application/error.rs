use std::error::Error as StdError;

use axum::{http::StatusCode, response::Response};
use thiserror::Error;

use crate::{
    application::api_keys::ApiKeyError, application::repos::RepoError, infra::error::InfraError,
};

/// Failure details attached to a response for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Top-level failure of a command run from `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("resource not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Short operator-facing label for the failure class.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Infra(InfraError::Configuration(_)) => "configuration",
            AppError::Infra(InfraError::Telemetry(_)) => "telemetry",
            AppError::Infra(InfraError::Bind { .. }) => "network",
            AppError::Infra(InfraError::Connect(_) | InfraError::Migration(_)) | AppError::Repo(_) => {
                "database"
            }
            AppError::NotFound => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<ApiKeyError> for AppError {
    fn from(error: ApiKeyError) -> Self {
        match error {
            ApiKeyError::Repo(err) => AppError::Repo(err),
            ApiKeyError::EmptyName => AppError::validation("key name must not be empty"),
            ApiKeyError::NotFound => AppError::NotFound,
        }
    }
}
