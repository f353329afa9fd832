use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;

/// Shared application state
///
/// Holds the configuration and the SQLite pool. `Clone` is cheap: the pool
/// is internally reference-counted.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    /// Initialize server state:
    ///
    /// 1. work directory layout (database/, logs/)
    /// 2. SQLite pool + migrations
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or migrated; the server is
    /// useless without it.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.resolved_database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::new(config.clone(), db_service.pool)
    }

    pub fn get_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn work_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.config.work_dir)
    }
}
