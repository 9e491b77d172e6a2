use sqlx::{Executor, PgPool};
use tracing::info;

/// Migration scripts embedded at compile time, executed in order.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_analytics.sql",
        include_str!("sql/001_create_analytics.sql"),
    ),
    (
        "002_create_cameras.sql",
        include_str!("sql/002_create_cameras.sql"),
    ),
];

pub async fn run_migrations(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    for (name, sql) in MIGRATIONS {
        pool.execute(*sql).await?;
        info!("Applied migration: {}", name);
    }

    Ok(())
}
