//! Database connection pool using OnceCell pattern.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::settings::Settings;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get or initialize the database connection pool.
pub async fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        let settings = Settings::new().map_err(|e| sqlx::Error::Configuration(Box::new(e)))?;

        tracing::info!(max_connections = settings.database.pool, "Connecting to database");
        PgPoolOptions::new()
            .max_connections(settings.database.pool)
            .connect(&settings.database.url)
            .await
    })
    .await
}
