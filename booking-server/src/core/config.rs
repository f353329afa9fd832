use std::path::PathBuf;

/// Server configuration
///
/// Every item can be overridden through environment variables:
///
/// | Variable      | Default                  | Meaning                      |
/// |---------------|--------------------------|------------------------------|
/// | WORK_DIR      | /var/lib/booking-service | Working directory (db, logs) |
/// | HTTP_PORT     | 3000                     | HTTP API port                |
/// | ENVIRONMENT   | development              | Runtime environment          |
/// | DATABASE_PATH | {WORK_DIR}/database/booking.db | SQLite file path       |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Explicit SQLite file path; falls back to {work_dir}/database/booking.db
    pub database_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, using defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/booking-service".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            database_path: std::env::var("DATABASE_PATH").ok(),
        }
    }

    /// Override work dir and port, typically for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Directory holding the SQLite database
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding rolling log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Resolved SQLite file path (DATABASE_PATH wins over work_dir layout)
    pub fn resolved_database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => self.database_dir().join("booking.db"),
        }
    }

    /// Create the work directory layout if it does not exist yet
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
