use sqlx::migrate::Migrator;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

/// Schema history under `migrations/`, applied strictly in version order.
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await?;
    info!("connected to PostgreSQL");
    Ok(pool)
}

/// Applies pending migrations. Already applied versions are skipped, and a
/// database whose history diverges from the embedded set is rejected before
/// anything runs.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    MIGRATOR.run(pool).await?;
    info!(
        latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default(),
        "migrations completed"
    );
    Ok(())
}
