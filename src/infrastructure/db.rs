use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::domain::errors::RepositoryResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens a connection pool and applies the schema migrations
///
/// Foreign-key enforcement is switched on for every connection. For an
/// in-memory database the pool is pinned to a single, never-recycled
/// connection: each SQLite connection would otherwise open its own
/// private in-memory database.
pub async fn connect(database_url: &str) -> RepositoryResult<SqlitePool> {
    tracing::info!(url = database_url, "connecting to database");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let mut pool_options = SqlitePoolOptions::new();
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(5);
    }

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;

    tracing::info!("database connected");
    Ok(pool)
}

/// Opens a pool using `DATABASE_URL` from the environment
///
/// Falls back to an in-memory database when the variable is not set.
pub async fn connect_from_env() -> RepositoryResult<SqlitePool> {
    dotenv::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::warn!("DATABASE_URL not set, using in-memory database");
        "sqlite::memory:".to_string()
    });

    connect(&database_url).await
}
