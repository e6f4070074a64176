//! Runs the builders in dependency order.
//!
//! Each step checks out its own connection and commits on its own; a failing
//! step leaves the tables of earlier steps in place.

use std::path::Path;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::db::{drop_all_tables, Database, DbConnection};
use crate::dimensions;
use crate::error::PipelineError;
use crate::facts;

/// Row counts inserted per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub regions: usize,
    pub countries: usize,
    pub customers: usize,
    pub product_categories: usize,
    pub products: usize,
    pub order_details: usize,
}

type Step = fn(&mut DbConnection, &Path) -> Result<usize, PipelineError>;

/// Normalization pipeline bound to one database
pub struct Pipeline {
    db: Database,
    drop_existing: bool,
}

impl Pipeline {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            drop_existing: true,
        }
    }

    /// Open the database described by `config`
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let db = if config.delete_database {
            Database::recreate(&config.database, config.pool.clone())?
        } else {
            Database::new_with_config(&config.database, config.pool.clone())?
        };
        Ok(Self::new(db).drop_existing(config.drop_existing))
    }

    /// Whether to drop the normalized tables before loading (default: true).
    ///
    /// Loading again without dropping appends duplicate rows.
    pub fn drop_existing(mut self, drop_existing: bool) -> Self {
        self.drop_existing = drop_existing;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Load `input` into every table
    pub fn run(&self, input: &Path) -> Result<LoadReport, PipelineError> {
        tracing::info!(
            "Normalizing {} into {}",
            input.display(),
            self.db.path().display()
        );

        if self.drop_existing {
            let mut conn = self.db.get_connection()?;
            drop_all_tables(&mut conn)?;
            tracing::debug!("Dropped existing tables");
        }

        let report = LoadReport {
            regions: self.step("region", input, dimensions::build_region_table)?,
            countries: self.step("country", input, dimensions::build_country_table)?,
            customers: self.step("customer", input, dimensions::build_customer_table)?,
            product_categories: self.step(
                "productcategory",
                input,
                dimensions::build_product_category_table,
            )?,
            products: self.step("product", input, dimensions::build_product_table)?,
            order_details: self.step("OrderDetail", input, facts::build_order_detail_table)?,
        };

        tracing::info!("Normalization complete: {:?}", report);
        Ok(report)
    }

    fn step(&self, table: &str, input: &Path, build: Step) -> Result<usize, PipelineError> {
        let mut conn = self.db.get_connection()?;
        build(&mut conn, input).map_err(|e| {
            tracing::error!("Building {} failed: {}", table, e);
            e
        })
    }
}
