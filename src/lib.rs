//! # ordernorm: flat order file normalization
//!
//! Ordernorm reads a tab-delimited order file (one customer order per line,
//! with semicolon-joined parallel lists of products) and normalizes it into a
//! SQLite schema of regions, countries, customers, product categories,
//! products and order details. A fixed catalog of analytic queries runs
//! against the result.
//!
//! ## Data flow
//!
//! ```text
//! input file -> dimension tables -> lookup maps -> OrderDetail -> queries
//! ```
//!
//! Rows are always sorted before they are inserted, so surrogate ids are the
//! same on every run over the same input.
//!
//! ## Example
//!
//! ```ignore
//! use ordernorm::{Database, Pipeline};
//!
//! let pipeline = Pipeline::new(Database::new("normalized.db")?);
//! let report = pipeline.run("data.csv".as_ref())?;
//!
//! let mut conn = pipeline.database().get_connection()?;
//! let totals = ordernorm::queries::region_totals(&mut conn)?;
//! ```

// Core modules
pub mod error;
pub mod record;
pub mod config;

// Output store
pub mod db;

// Normalization steps
pub mod dimensions;
pub mod lookup;
pub mod facts;
pub mod pipeline;

// Analytic query catalog
pub mod queries;

// Re-export key types
pub use error::PipelineError;
pub use record::{OrderItem, OrderRecord, parse_line, read_records};
pub use config::{ConfigOverrides, PipelineConfig};
pub use db::{Database, DatabaseConfig, BulkInsert};
pub use lookup::LookupMap;
pub use pipeline::{LoadReport, Pipeline};
pub use queries::{AnalyticQuery, QueryOutput};
