//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use ordernorm::{Database, Pipeline};
use tempfile::TempDir;

pub const HEADER: &str = "Name\tAddress\tCity\tCountry\tRegion\tProductName\tProductCategory\tProductCategoryDescription\tProductUnitPrice\tQuantityOrderded\tOrderDate";

pub const JANE_DOE: &str = "Jane Doe\t123 Elm St\tParis\tFrance\tWestern Europe\tChai;Tofu\t1;2\tBeverages;Produce\t18.00;23.25\t10;5\t20210101;20210105";

/// Three customers in two regions, spread over four quarters
pub const ORDERS: [&str; 4] = [
    JANE_DOE,
    "Hans Muller\t1 Hauptstr\tBerlin\tGermany\tWestern Europe\tChai\t1\tBeverages\t18.00\t20\t20210410",
    "Ana Trujillo\tAvda 2222\tMexico City\tMexico\tCentral America\tTofu;Chang\t2;1\tProduce;Beverages\t23.25;19.00\t4;3\t20210701;20211015",
    "Jane Doe\t123 Elm St\tParis\tFrance\tWestern Europe\tChang\t1\tBeverages\t19.00\t1\t20210201",
];

/// A temp directory holding an input file and a database path
pub struct Fixture {
    pub dir: TempDir,
    pub input: PathBuf,
    pub database: PathBuf,
}

impl Fixture {
    pub fn new(lines: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = dir.path().join("data.csv");
        let database = dir.path().join("normalized.db");
        write_input(&input, lines);
        Self { dir, input, database }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(Database::new(&self.database).expect("Failed to open database"))
    }

    /// Run the full pipeline and hand back the loaded pipeline
    pub fn load(&self) -> Pipeline {
        let pipeline = self.pipeline();
        pipeline.run(&self.input).expect("Pipeline failed");
        pipeline
    }
}

pub fn write_input(path: &PathBuf, lines: &[&str]) {
    let mut contents = String::from(HEADER);
    for line in lines {
        contents.push('\n');
        contents.push_str(line);
    }
    contents.push('\n');
    fs::write(path, contents).expect("Failed to write input file");
}
