//! Database migration commands.
//!
//! Both databases hold only the tower-sessions schema; everything else lives
//! in the catalog API.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for storefront
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin

use sqlx::PgPool;
use tracing::info;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn database_url(key: &'static str) -> Result<String, MigrationError> {
    std::env::var(key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar(key))
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the env var is missing, the connection fails,
/// or a migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let url = database_url("STOREFRONT_DATABASE_URL")?;

    info!("Connecting to storefront database...");
    let pool = PgPool::connect(&url).await?;

    info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Storefront migrations complete!");
    Ok(())
}

/// Run admin database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the env var is missing, the connection fails,
/// or a migration fails.
pub async fn admin() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let url = database_url("ADMIN_DATABASE_URL")?;

    info!("Connecting to admin database...");
    let pool = PgPool::connect(&url).await?;

    info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    info!("Admin migrations complete!");
    Ok(())
}
