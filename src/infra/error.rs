use std::net::SocketAddr;

use thiserror::Error;

/// Failures while bringing up or running the service's external resources.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn bind(addr: SocketAddr, source: std::io::Error) -> Self {
        Self::Bind { addr, source }
    }
}
