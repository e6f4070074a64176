//! Database connection management and table creation
//!
//! This module provides Diesel-based SQLite connectivity with connection pooling.

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::error::PipelineError;

pub type DbConnection = SqliteConnection;
pub type Pool = r2d2::Pool<ConnectionManager<DbConnection>>;
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<DbConnection>>;

/// Database connection pool manager
pub struct Database {
    pool: Arc<Pool>,
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the SQLite file at `path`
    ///
    /// # Example
    /// ```ignore
    /// let db = Database::new("normalized.db")?;
    /// let mut conn = db.get_connection()?;
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::new_with_config(path, DatabaseConfig::default())
    }

    /// Open the database with custom pool configuration
    pub fn new_with_config<P: AsRef<Path>>(
        path: P,
        config: DatabaseConfig,
    ) -> Result<Self, PipelineError> {
        let path = path.as_ref().to_path_buf();
        let manager = ConnectionManager::<DbConnection>::new(path.to_string_lossy());

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_idle))
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connection_customizer(Box::new(ConnectionOptions {
                foreign_keys: config.foreign_keys,
            }))
            .build(manager)?;

        tracing::debug!("Opened database {}", path.display());

        Ok(Database {
            pool: Arc::new(pool),
            path,
        })
    }

    /// Remove any existing database file, then open a new one
    pub fn recreate<P: AsRef<Path>>(path: P, config: DatabaseConfig) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if path.exists() {
            std::fs::remove_file(path).map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!("Deleted existing database {}", path.display());
        }
        Self::new_with_config(path, config)
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<PooledConnection, PipelineError> {
        Ok(self.pool.get()?)
    }

    /// Test database connectivity
    pub fn test_connection(&self) -> Result<(), PipelineError> {
        let mut conn = self.get_connection()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Database configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_idle: u32,
    pub connection_timeout_secs: u64,
    /// Run `PRAGMA foreign_keys = ON` on every new connection
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            max_connections: 4,          // single writer, a few readers
            min_idle: 1,
            connection_timeout_secs: 30,
            foreign_keys: true,
        }
    }
}

#[derive(Debug)]
struct ConnectionOptions {
    foreign_keys: bool,
}

impl CustomizeConnection<DbConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut DbConnection) -> Result<(), r2d2::Error> {
        let pragma = if self.foreign_keys {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        diesel::sql_query(pragma)
            .execute(conn)
            .map(|_| ())
            .map_err(r2d2::Error::QueryError)
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// Execute a CREATE TABLE statement, optionally dropping `drop_table_name` first.
///
/// Failures are logged and swallowed: a builder keeps going and any real
/// problem surfaces when it inserts.
pub fn create_table(conn: &mut DbConnection, create_table_sql: &str, drop_table_name: Option<&str>) {
    if let Some(table) = drop_table_name {
        if identifier_pattern().is_match(table) {
            if let Err(e) = diesel::sql_query(format!("DROP TABLE IF EXISTS {}", table)).execute(conn) {
                tracing::error!("Failed to drop table {}: {}", table, e);
            }
        } else {
            tracing::error!("Refusing to drop table with invalid name '{}'", table);
        }
    }

    if let Err(e) = diesel::sql_query(create_table_sql).execute(conn) {
        tracing::error!("Failed to create table: {}", e);
    }
}
