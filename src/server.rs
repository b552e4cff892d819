use crate::config::{Config, StorageConfig};
use crate::{routes, state};
use anyhow::Context;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{self, SqliteJournalMode};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

pub struct ServerArgs<'a> {
    pub config: &'a Config,
}

static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the pool and brings the schema up to date. Any failure here means
/// storage is unavailable and the process must not start serving.
pub async fn connect_database(config: &StorageConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let path = config.parse_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create SQLite database directory: {}", parent.display())
        })?;
    }
    let options = sqlite::SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.get_busy_timeout());
    let pool = sqlite::SqlitePoolOptions::new()
        .max_connections(config.get_max_connections())
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", path.display()))?;
    MIGRATOR
        .run(&pool)
        .await
        .with_context(|| format!("Failed to migrate SQLite database: {}", path.display()))?;
    tracing::info!("Storage ready at {}", path.display());
    Ok(pool)
}

pub async fn run_until_done(args: ServerArgs<'_>, bind: TcpListener) -> anyhow::Result<()> {
    let pool = connect_database(&args.config.storage).await?;
    let shutdown_signal = CancellationToken::new();
    let mut signals = JoinSet::new();
    // register ctrl+c signal
    {
        let shutdown_signal = shutdown_signal.clone();
        signals.spawn(async move {
            signal::ctrl_c().await?;
            tracing::debug!("Received Ctrl+C, start terminating");
            shutdown_signal.cancel();
            Ok::<_, anyhow::Error>(())
        });
    }
    #[cfg(unix)]
    {
        let shutdown_signal = shutdown_signal.clone();
        signals.spawn(async move {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            sigterm.recv().await;
            tracing::debug!("Received SIGTERM signal, start terminating");
            shutdown_signal.cancel();
            Ok::<_, anyhow::Error>(())
        });
    }
    let state = state::AppState::build(pool.clone(), &args.config.storage);
    let routes = routes::build().with_state(state);
    let served = {
        let shutdown_signal = shutdown_signal.clone();
        axum::serve(
            bind,
            routes.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_signal.cancelled().await;
        })
        .await
    };
    // in-flight requests are drained by now
    while let Some(res) = signals.try_join_next() {
        if let Ok(Err(err)) = res {
            tracing::warn!(reason = ?err, "signal handler failed");
        }
    }
    signals.shutdown().await;
    pool.close().await;
    tracing::info!("Shutdown complete");
    served.context("HTTP server terminated unexpectedly")
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> sqlx::SqlitePool {
    // A single connection keeps the in-memory database alive and shared.
    let pool = sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}
