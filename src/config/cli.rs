use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use uuid::Uuid;

/// Command-line arguments for the sectorboard binary.
#[derive(Debug, Parser)]
#[command(
    name = "sectorboard",
    version,
    about = "Read-only market data API with cached list endpoints"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "SECTORBOARD_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP API.
    Serve(Box<ServeArgs>),
    /// Manage API keys.
    Keys(KeysArgs),
    /// Apply pending database migrations.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the lifetime of cached list responses.
    #[arg(long = "cache-ttl-seconds", value_name = "SECONDS")]
    pub cache_ttl_seconds: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct KeysArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    #[command(subcommand)]
    pub command: KeysCommand,
}

#[derive(Debug, Subcommand, Clone)]
pub enum KeysCommand {
    /// Issue a new key and print its token once.
    Issue(IssueKeyArgs),
    /// List all keys with their status.
    List,
    /// Revoke a key by id.
    Revoke(RevokeKeyArgs),
}

#[derive(Debug, Args, Clone)]
pub struct IssueKeyArgs {
    /// Human-readable key name.
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Optional free-form description.
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Expire the key after this many days.
    #[arg(long = "expires-in-days", value_name = "DAYS")]
    pub expires_in_days: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct RevokeKeyArgs {
    /// Identifier of the key to revoke.
    #[arg(value_name = "ID")]
    pub id: Uuid,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}
