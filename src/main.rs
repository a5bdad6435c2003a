use std::{future::IntoFuture, process, sync::Arc};

use sectorboard::{
    application::{
        api_keys::{ApiKeyService, IssueApiKeyCommand},
        error::AppError,
        listing::CachedListService,
    },
    cache::{CacheConfig, MemoryCacheStore},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use time::OffsetDateTime;
use tokio::signal;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, category = error.category(), "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, category = error.category(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Keys(args) => run_keys(settings, args).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn init_repositories(settings: &config::Settings) -> Result<PostgresRepositories, AppError> {
    let url = settings.database.url.as_deref().ok_or_else(|| {
        InfraError::configuration("database.url must be set (SECTORBOARD__DATABASE__URL)")
    })?;

    let pool = PostgresRepositories::connect(
        url,
        settings.database.max_connections.get(),
        settings.database.statement_timeout,
    )
    .await
    .map_err(InfraError::Connect)?;

    Ok(PostgresRepositories::new(pool))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = Arc::new(init_repositories(&settings).await?);
    let cache_config = CacheConfig::from(&settings.cache);

    let state = ApiState {
        api_keys: Arc::new(ApiKeyService::new(repositories.clone())),
        lists: Arc::new(CachedListService::new(
            Arc::new(MemoryCacheStore::new()),
            &cache_config,
        )),
        institutions: repositories.clone(),
        reports: repositories.clone(),
        metadata: repositories.clone(),
        health: repositories,
    };

    serve_http(&settings, state).await
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| InfraError::bind(settings.server.addr, err))?;

    info!(
        target = "sectorboard::serve",
        addr = %settings.server.addr,
        cache_ttl_secs = settings.cache.ttl_seconds.get(),
        "listening"
    );

    let grace = settings.server.graceful_shutdown;
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // bound the drain phase once a shutdown signal arrives
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "sectorboard::serve",
                grace_secs = grace.as_secs(),
                "graceful shutdown timed out"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "sectorboard::serve", "shutdown signal received");
}

async fn run_keys(settings: config::Settings, args: config::KeysArgs) -> Result<(), AppError> {
    let repositories = Arc::new(init_repositories(&settings).await?);
    let service = ApiKeyService::new(repositories);

    match args.command {
        config::KeysCommand::Issue(issue) => {
            let expires_at = issue
                .expires_in_days
                .map(|days| OffsetDateTime::now_utc() + time::Duration::days(i64::from(days)));
            let issued = service
                .issue(IssueApiKeyCommand {
                    name: issue.name,
                    description: issue.description,
                    expires_at,
                })
                .await?;

            info!(
                target = "sectorboard::keys",
                key_id = %issued.record.id,
                prefix = %issued.record.prefix,
                "api key issued"
            );
            println!("id:    {}", issued.record.id);
            println!("token: {}", issued.token);
            println!("store this token now; it cannot be shown again");
        }
        config::KeysCommand::List => {
            let now = OffsetDateTime::now_utc();
            for key in service.list().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    key.id,
                    key.prefix,
                    key.status_at(now),
                    key.name
                );
            }
        }
        config::KeysCommand::Revoke(revoke) => {
            service.revoke(revoke.id).await?;
            info!(target = "sectorboard::keys", key_id = %revoke.id, "api key revoked");
        }
    }

    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    PostgresRepositories::run_migrations(repositories.pool())
        .await
        .map_err(InfraError::Migration)?;
    info!(target = "sectorboard::migrate", "migrations applied");
    Ok(())
}
