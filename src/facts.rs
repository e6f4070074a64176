//! Fact builder for the OrderDetail table.
//!
//! Every item of every order line becomes one fact row. Customer and product
//! names must all resolve: a single miss aborts the build before any row is
//! inserted.

use std::path::Path;

use crate::db::models::NewOrderDetail;
use crate::db::schema::CREATE_ORDER_DETAIL;
use crate::db::{create_table, BulkInsert, DbConnection};
use crate::error::PipelineError;
use crate::lookup::{self, LookupMap};
use crate::record::{read_records, OrderRecord};

/// Resolve every order item to a fact row, sorted by CustomerID.
///
/// The sort is stable, so rows of the same customer keep file order (line,
/// then item position).
pub fn derive_order_details(
    records: &[OrderRecord],
    customers: &LookupMap,
    products: &LookupMap,
) -> Result<Vec<NewOrderDetail>, PipelineError> {
    let mut rows = Vec::new();

    for record in records {
        let customer_id = customers.resolve(&record.customer_key())?;
        for item in &record.items {
            rows.push(NewOrderDetail {
                customer_id,
                product_id: products.resolve(&item.product_name)?,
                order_date: item.order_date_iso(),
                quantity_ordered: item.quantity,
            });
        }
    }

    rows.sort_by_key(|row| row.customer_id);
    Ok(rows)
}

/// Create and populate `OrderDetail` from the persisted customers and products
pub fn build_order_detail_table(
    conn: &mut DbConnection,
    input: &Path,
) -> Result<usize, PipelineError> {
    let customers = lookup::customer_ids(conn)?;
    let products = lookup::product_ids(conn)?;
    let records = read_records(input)?;
    let rows = derive_order_details(&records, &customers, &products)?;

    create_table(conn, CREATE_ORDER_DETAIL, None);
    let inserted = NewOrderDetail::bulk_insert(conn, &rows)?;
    tracing::info!("Inserted {} rows into {}", inserted, NewOrderDetail::TABLE);
    Ok(inserted)
}
