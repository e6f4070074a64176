//! SQLite output store: connection pool, schema, models and batch inserts.

pub mod database;
pub mod models;
pub mod operations;
pub mod schema;

// Re-export key types
pub use database::{create_table, Database, DatabaseConfig, DbConnection, Pool, PooledConnection};
pub use operations::{drop_all_tables, BulkInsert};
