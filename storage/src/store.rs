//! Opened database handle: pool plus schema initialisation.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::sqlite_pool::SqlitePoolManager;
use crate::{schema, StorageError};

#[derive(Clone)]
pub struct ChatStore {
    pool_manager: SqlitePoolManager,
}

impl ChatStore {
    /// Opens (creating if needed) the database and ensures the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        schema::init(pool_manager.pool()).await?;
        info!(database_url = %database_url, "chat store ready");
        Ok(Self { pool_manager })
    }

    pub fn pool(&self) -> &SqlitePool {
        self.pool_manager.pool()
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StorageError> {
        Ok(self.pool().begin().await?)
    }
}
