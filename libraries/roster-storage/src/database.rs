/// Database handle shared by the server, the importer and the CLI
use crate::context::LocalStorageContext;
use crate::error::StorageError;
use roster_core::{ReportingScope, User};
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database and apply migrations
    ///
    /// # Errors
    /// Returns an error if the connection fails or migrations fail
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::create_pool(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        crate::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Storage context acting on behalf of `actor`
    pub fn context(&self, actor: User, scope: ReportingScope) -> LocalStorageContext {
        LocalStorageContext::new(self.pool.clone(), actor, scope)
    }
}
