//! Batch insertion for the normalized tables.

use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::db::database::DbConnection;
use crate::db::models::*;
use crate::db::schema::*;

/// Upper bound on rows per multi-row INSERT, well under SQLite's bound-variable limit
pub const INSERT_CHUNK_SIZE: usize = 500;

/// Insert a batch of rows in the order given.
///
/// SQLite assigns `INTEGER PRIMARY KEY` values in insertion order, so callers
/// sort before inserting to get stable surrogate keys.
pub trait BulkInsert: Sized {
    /// Name of the target table, for logging
    const TABLE: &'static str;

    /// Insert one chunk of rows
    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError>;

    /// Insert all rows in one transaction, chunked
    fn bulk_insert(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        conn.transaction(|conn| {
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                inserted += Self::insert_chunk(conn, chunk)?;
            }
            Ok(inserted)
        })
    }
}

impl BulkInsert for NewRegion {
    const TABLE: &'static str = "region";

    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        diesel::insert_into(region::table).values(rows).execute(conn)
    }
}

impl BulkInsert for NewCountry {
    const TABLE: &'static str = "country";

    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        diesel::insert_into(country::table).values(rows).execute(conn)
    }
}

impl BulkInsert for NewCustomer {
    const TABLE: &'static str = "customer";

    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        diesel::insert_into(customer::table).values(rows).execute(conn)
    }
}

impl BulkInsert for NewProductCategory {
    const TABLE: &'static str = "productcategory";

    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        diesel::insert_into(product_category::table).values(rows).execute(conn)
    }
}

impl BulkInsert for NewProduct {
    const TABLE: &'static str = "product";

    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        diesel::insert_into(product::table).values(rows).execute(conn)
    }
}

impl BulkInsert for NewOrderDetail {
    const TABLE: &'static str = "OrderDetail";

    fn insert_chunk(conn: &mut DbConnection, rows: &[Self]) -> Result<usize, DieselError> {
        diesel::insert_into(order_detail::table).values(rows).execute(conn)
    }
}

/// Drop every normalized table, children first
pub fn drop_all_tables(conn: &mut DbConnection) -> Result<(), DieselError> {
    for table in TABLES.iter().rev() {
        diesel::sql_query(format!("DROP TABLE IF EXISTS {}", table)).execute(conn)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::database::{create_table, Database};

    #[test]
    fn test_bulk_insert_assigns_ids_in_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("ops.db")).unwrap();
        let mut conn = db.get_connection().unwrap();
        create_table(&mut conn, CREATE_REGION, None);

        let rows: Vec<NewRegion> = (0..(INSERT_CHUNK_SIZE + 3))
            .map(|i| NewRegion { name: format!("R{:04}", i) })
            .collect();
        let inserted = NewRegion::bulk_insert(&mut conn, &rows).unwrap();
        assert_eq!(inserted, rows.len());

        let loaded: Vec<Region> = region::table
            .order(region::region_id)
            .select(Region::as_select())
            .load(&mut conn)
            .unwrap();
        assert_eq!(loaded.len(), rows.len());
        assert_eq!(loaded[0], Region { region_id: 1, name: "R0000".to_string() });
        assert_eq!(loaded[INSERT_CHUNK_SIZE].name, format!("R{:04}", INSERT_CHUNK_SIZE));
    }

    #[test]
    fn test_drop_all_tables_respects_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("ops.db")).unwrap();
        let mut conn = db.get_connection().unwrap();
        create_table(&mut conn, CREATE_REGION, None);
        create_table(&mut conn, CREATE_COUNTRY, None);

        NewRegion::bulk_insert(&mut conn, &[NewRegion { name: "Europe".to_string() }]).unwrap();
        NewCountry::bulk_insert(
            &mut conn,
            &[NewCountry { name: "France".to_string(), region_id: 1 }],
        )
        .unwrap();

        drop_all_tables(&mut conn).unwrap();
        let remaining: i64 = diesel::dsl::select(diesel::dsl::sql::<diesel::sql_types::BigInt>(
            "(SELECT count(*) FROM sqlite_master WHERE type = 'table')",
        ))
        .get_result(&mut conn)
        .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_foreign_key_violation_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("ops.db")).unwrap();
        let mut conn = db.get_connection().unwrap();
        create_table(&mut conn, CREATE_REGION, None);
        create_table(&mut conn, CREATE_COUNTRY, None);

        let result = NewCountry::bulk_insert(
            &mut conn,
            &[NewCountry { name: "Atlantis".to_string(), region_id: 42 }],
        );
        assert!(result.is_err());
    }
}
