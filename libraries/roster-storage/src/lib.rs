//! Roster Storage
//!
//! `SQLite` database layer for Roster.
//!
//! This crate persists users, employees and feedback, and enforces the access
//! rules from `roster-core` in front of every read and write.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries and logic
//! - **Actor-bound**: checked operations take the acting [`User`](roster_core::User)
//! - **Transactional writes**: each write runs in one transaction; a dropped
//!   transaction rolls back
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_core::{ReportingScope, StorageContext};
//! use roster_storage::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("sqlite://roster.db").await?;
//!
//! let Some(actor) = roster_storage::users::find_by_username(db.pool(), "asha").await? else {
//!     return Ok(());
//! };
//!
//! let storage = db.context(actor, ReportingScope::Extended);
//! let employees = storage.list_employees().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod database;
mod error;

// Vertical slices
pub mod dashboard;
pub mod employees;
pub mod feedback;
pub mod hierarchy;
pub mod users;

pub use context::LocalStorageContext;
pub use database::Database;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup to bring the schema up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://roster.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
