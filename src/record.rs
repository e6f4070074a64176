//! Line parser for the flat order file.
//!
//! Each data line carries one customer order: five scalar columns followed by
//! six semicolon-joined lists that are aligned by position, one entry per
//! ordered product.
//!
//! ```text
//! [0] name  [1] address  [2] city  [3] country  [4] region
//! [5] products  [6] category codes  [7] category descriptions
//! [8] unit prices  [9] quantities  [10] order dates (YYYYMMDD)
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::PipelineError;

/// Number of tab-separated columns on every data line
pub const FIELD_COUNT: usize = 11;

const LIST_SEPARATOR: char = ';';
const INPUT_DATE_FORMAT: &str = "%Y%m%d";

const LIST_FIELDS: [(usize, &str); 6] = [
    (5, "product names"),
    (6, "category codes"),
    (7, "category descriptions"),
    (8, "unit prices"),
    (9, "quantities"),
    (10, "order dates"),
];

/// One product line within an order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_name: String,
    pub category_code: String,
    pub category_description: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub order_date: NaiveDate,
}

impl OrderItem {
    /// Order date in the `YYYY-MM-DD` form stored in the fact table
    pub fn order_date_iso(&self) -> String {
        self.order_date.format("%Y-%m-%d").to_string()
    }
}

/// A fully decomposed data line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    /// 1-based line number in the source file (header is line 1)
    pub line_number: usize,
    pub customer_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub region: String,
    pub items: Vec<OrderItem>,
}

impl OrderRecord {
    /// First name and last name, split on the first space.
    ///
    /// A name without a space yields an empty last name.
    pub fn name_parts(&self) -> (&str, &str) {
        self.customer_name
            .split_once(' ')
            .unwrap_or((self.customer_name.as_str(), ""))
    }

    /// Customer key in the same "First Last" form the customer lookup returns
    pub fn customer_key(&self) -> String {
        let (first, last) = self.name_parts();
        customer_key(first, last)
    }
}

/// Join first and last name the way the customer lookup keys them
pub fn customer_key(first: &str, last: &str) -> String {
    format!("{} {}", first, last)
}

/// Parse one data line.
///
/// Fails fast on a wrong column count, misaligned list lengths, or any price,
/// quantity or date that does not parse. Nothing is truncated or defaulted.
pub fn parse_line(line: &str, line_number: usize) -> Result<OrderRecord, PipelineError> {
    let fields: Vec<&str> = line.trim().split('\t').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(PipelineError::malformed(
            line_number,
            format!("found {} fields, expected {}", fields.len(), FIELD_COUNT),
        ));
    }

    let lists: Vec<Vec<&str>> = LIST_FIELDS
        .iter()
        .map(|(index, _)| split_list(fields[*index]))
        .collect();

    let expected = lists[0].len();
    for (list, (_, label)) in lists.iter().zip(LIST_FIELDS.iter()).skip(1) {
        if list.len() != expected {
            return Err(PipelineError::malformed(
                line_number,
                format!(
                    "{} has {} entries but product names has {}",
                    label,
                    list.len(),
                    expected
                ),
            ));
        }
    }

    let mut items = Vec::with_capacity(expected);
    for i in 0..expected {
        let unit_price = lists[3][i].parse::<f64>().map_err(|_| {
            PipelineError::malformed(line_number, format!("invalid unit price '{}'", lists[3][i]))
        })?;
        if !unit_price.is_finite() {
            return Err(PipelineError::malformed(
                line_number,
                format!("invalid unit price '{}'", lists[3][i]),
            ));
        }
        let quantity = lists[4][i].parse::<i32>().map_err(|_| {
            PipelineError::malformed(line_number, format!("invalid quantity '{}'", lists[4][i]))
        })?;
        let order_date = NaiveDate::parse_from_str(lists[5][i], INPUT_DATE_FORMAT)
            .ok()
            .filter(|_| lists[5][i].len() == 8)
            .ok_or_else(|| {
                PipelineError::malformed(line_number, format!("invalid order date '{}'", lists[5][i]))
            })?;

        items.push(OrderItem {
            product_name: lists[0][i].to_string(),
            category_code: lists[1][i].to_string(),
            category_description: lists[2][i].to_string(),
            unit_price,
            quantity,
            order_date,
        });
    }

    Ok(OrderRecord {
        line_number,
        customer_name: fields[0].to_string(),
        address: fields[1].to_string(),
        city: fields[2].to_string(),
        country: fields[3].to_string(),
        region: fields[4].to_string(),
        items,
    })
}

fn split_list(field: &str) -> Vec<&str> {
    field.split(LIST_SEPARATOR).map(str::trim).collect()
}

/// Parse file contents: the first line is the header and is always skipped,
/// blank lines are ignored.
pub fn parse_records(contents: &str) -> Result<Vec<OrderRecord>, PipelineError> {
    contents
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(line, index + 1))
        .collect()
}

/// Read and parse a whole input file
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<OrderRecord>, PipelineError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&contents)?;
    tracing::debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}
