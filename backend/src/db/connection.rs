use sqlx::postgres::{PgPool, PgPoolOptions};
use std::{sync::Arc, time::Duration};

pub type DbPool = Arc<PgPool>;

const MAX_CONNECTIONS: u32 = 10;

pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    tracing::debug!(max_connections = MAX_CONNECTIONS, "Database pool ready");
    Ok(Arc::new(pool))
}
