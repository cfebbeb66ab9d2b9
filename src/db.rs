use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;

use crate::config::ScannerConfig;

/// Per-connection SQLite pragmas, applied via the after_connect callback.
async fn configure_sqlite_pragmas(conn: &mut sqlx::SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Executor;

    // WAL lets readers proceed while a scan is being written
    conn.execute("PRAGMA journal_mode = WAL").await?;
    conn.execute("PRAGMA synchronous = NORMAL").await?;
    conn.execute("PRAGMA busy_timeout = 5000").await?;
    conn.execute("PRAGMA temp_store = MEMORY").await?;

    // Web page deletion relies on ON DELETE CASCADE
    conn.execute("PRAGMA foreign_keys = ON").await?;

    Ok(())
}

pub async fn init_db(config: &ScannerConfig) -> Result<SqlitePool> {
    log::info!("[DB] Connecting to {}", config.database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                configure_sqlite_pragmas(conn).await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to database at {}", config.database_url))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    log::info!("[DB] Database ready");
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
pub async fn init_memory_db() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                use sqlx::Executor;
                conn.execute("PRAGMA foreign_keys = ON").await?;
                Ok(())
            })
        })
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}
