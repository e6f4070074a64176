//! Dimension builders for region, country, customer, product category and product.
//!
//! Each builder reads the input file once, derives a deduplicated row set
//! (resolving parent keys through lookups built from already persisted
//! tables), sorts it, and inserts it in that order. The `derive_*` halves are
//! pure so they can be checked without a database.
//!
//! Unresolvable parents are handled differently per table: country and
//! customer rows are dropped with a warning, while a product whose category is
//! unknown aborts the build.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use crate::db::models::{NewCountry, NewCustomer, NewProduct, NewProductCategory, NewRegion};
use crate::db::schema::{
    CREATE_COUNTRY, CREATE_CUSTOMER, CREATE_PRODUCT, CREATE_PRODUCT_CATEGORY, CREATE_REGION,
};
use crate::db::{create_table, BulkInsert, DbConnection};
use crate::error::PipelineError;
use crate::lookup::{self, LookupMap};
use crate::record::{read_records, OrderRecord};

/// Unique region names, sorted
pub fn derive_regions(records: &[OrderRecord]) -> Vec<NewRegion> {
    records
        .iter()
        .map(|r| r.region.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|name| NewRegion { name: name.to_string() })
        .collect()
}

/// Unique countries with their region id, sorted by name.
///
/// A country takes the region of the first line whose region resolves;
/// countries that never resolve are dropped.
pub fn derive_countries(records: &[OrderRecord], regions: &LookupMap) -> Vec<NewCountry> {
    let mut countries: BTreeMap<&str, i32> = BTreeMap::new();
    let mut unresolved: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        if countries.contains_key(record.country.as_str()) {
            continue;
        }
        match regions.get(&record.region) {
            Some(region_id) => {
                countries.insert(&record.country, region_id);
                unresolved.remove(record.country.as_str());
            }
            None => {
                unresolved.insert(&record.country);
            }
        }
    }

    for name in &unresolved {
        tracing::warn!("Dropping country '{}': region not found", name);
    }

    countries
        .into_iter()
        .map(|(name, region_id)| NewCountry {
            name: name.to_string(),
            region_id,
        })
        .collect()
}

/// One customer per distinct raw name, sorted by first name (then last name).
///
/// The first line whose country resolves supplies address, city and country;
/// customers whose country never resolves are dropped.
pub fn derive_customers(records: &[OrderRecord], countries: &LookupMap) -> Vec<NewCustomer> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unresolved: BTreeSet<&str> = BTreeSet::new();
    let mut customers = Vec::new();

    for record in records {
        if seen.contains(record.customer_name.as_str()) {
            continue;
        }
        let Some(country_id) = countries.get(&record.country) else {
            unresolved.insert(&record.customer_name);
            continue;
        };

        seen.insert(&record.customer_name);
        unresolved.remove(record.customer_name.as_str());

        let (first, last) = record.name_parts();
        customers.push(NewCustomer {
            first_name: first.to_string(),
            last_name: last.to_string(),
            address: record.address.clone(),
            city: record.city.clone(),
            country_id,
        });
    }

    for name in &unresolved {
        tracing::warn!("Dropping customer '{}': country not found", name);
    }

    customers.sort_by(|a, b| {
        a.first_name
            .cmp(&b.first_name)
            .then_with(|| a.last_name.cmp(&b.last_name))
    });
    customers
}

/// Unique category code -> description pairs, sorted by code.
///
/// The first description seen for a code is kept.
pub fn derive_product_categories(records: &[OrderRecord]) -> Vec<NewProductCategory> {
    let mut categories: BTreeMap<&str, &str> = BTreeMap::new();

    for item in records.iter().flat_map(|r| r.items.iter()) {
        match categories.get(item.category_code.as_str()) {
            Some(existing) if *existing != item.category_description => {
                tracing::warn!(
                    "Category '{}' also described as '{}'; keeping '{}'",
                    item.category_code,
                    item.category_description,
                    existing
                );
            }
            Some(_) => {}
            None => {
                categories.insert(&item.category_code, &item.category_description);
            }
        }
    }

    categories
        .into_iter()
        .map(|(code, description)| NewProductCategory {
            code: code.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Unique (name, unit price, category id) products, sorted by name.
///
/// Ties on name are ordered by price and then category id. Every category
/// code must resolve.
pub fn derive_products(
    records: &[OrderRecord],
    categories: &LookupMap,
) -> Result<Vec<NewProduct>, PipelineError> {
    let mut seen: HashSet<(&str, u64, i32)> = HashSet::new();
    let mut products = Vec::new();

    for item in records.iter().flat_map(|r| r.items.iter()) {
        let category_id = categories.resolve(&item.category_code)?;
        if seen.insert((item.product_name.as_str(), item.unit_price.to_bits(), category_id)) {
            products.push(NewProduct {
                name: item.product_name.clone(),
                unit_price: item.unit_price,
                product_category_id: category_id,
            });
        }
    }

    products.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.unit_price.total_cmp(&b.unit_price))
            .then_with(|| a.product_category_id.cmp(&b.product_category_id))
    });
    Ok(products)
}

fn insert_rows<T: BulkInsert>(conn: &mut DbConnection, rows: &[T]) -> Result<usize, PipelineError> {
    let inserted = T::bulk_insert(conn, rows)?;
    tracing::info!("Inserted {} rows into {}", inserted, T::TABLE);
    Ok(inserted)
}

/// Create and populate `region`
pub fn build_region_table(conn: &mut DbConnection, input: &Path) -> Result<usize, PipelineError> {
    let records = read_records(input)?;
    let rows = derive_regions(&records);

    create_table(conn, CREATE_REGION, None);
    insert_rows(conn, &rows)
}

/// Create and populate `country` from the persisted regions
pub fn build_country_table(conn: &mut DbConnection, input: &Path) -> Result<usize, PipelineError> {
    let regions = lookup::region_ids(conn)?;
    let records = read_records(input)?;
    let rows = derive_countries(&records, &regions);

    create_table(conn, CREATE_COUNTRY, None);
    insert_rows(conn, &rows)
}

/// Create and populate `customer` from the persisted countries
pub fn build_customer_table(conn: &mut DbConnection, input: &Path) -> Result<usize, PipelineError> {
    let countries = lookup::country_ids(conn)?;
    let records = read_records(input)?;
    let rows = derive_customers(&records, &countries);

    create_table(conn, CREATE_CUSTOMER, None);
    insert_rows(conn, &rows)
}

/// Create and populate `productcategory`
pub fn build_product_category_table(
    conn: &mut DbConnection,
    input: &Path,
) -> Result<usize, PipelineError> {
    let records = read_records(input)?;
    let rows = derive_product_categories(&records);

    create_table(conn, CREATE_PRODUCT_CATEGORY, None);
    insert_rows(conn, &rows)
}

/// Create and populate `product` from the persisted categories
pub fn build_product_table(conn: &mut DbConnection, input: &Path) -> Result<usize, PipelineError> {
    let categories = lookup::product_category_ids(conn)?;
    let records = read_records(input)?;
    let rows = derive_products(&records, &categories)?;

    create_table(conn, CREATE_PRODUCT, None);
    insert_rows(conn, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_records;

    const HEADER: &str = "Name\tAddress\tCity\tCountry\tRegion\tProductName\tProductCategory\tProductCategoryDescription\tProductUnitPrice\tQuantityOrderded\tOrderDate";

    fn records<S: AsRef<str>>(lines: &[S]) -> Vec<OrderRecord> {
        let contents = std::iter::once(HEADER)
            .chain(lines.iter().map(|l| l.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");
        parse_records(&contents).unwrap()
    }

    fn line(name: &str, country: &str, region: &str, products: &str, codes: &str) -> String {
        let n = products.split(';').count();
        let descriptions = codes.split(';').map(|c| format!("Cat{}", c)).collect::<Vec<_>>().join(";");
        let prices = vec!["10.00"; n].join(";");
        let quantities = vec!["1"; n].join(";");
        let dates = vec!["20210101"; n].join(";");
        format!(
            "{}\t1 Main St\tTown\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            name, country, region, products, codes, descriptions, prices, quantities, dates
        )
    }

    fn ids(table: &'static str, keys: &[&str]) -> LookupMap {
        LookupMap::from_pairs(
            table,
            keys.iter().enumerate().map(|(i, k)| (k.to_string(), i as i32 + 1)),
        )
    }

    #[test]
    fn test_regions_are_unique_and_sorted() {
        let recs = records(&[
            &line("A B", "Spain", "Southern Europe", "Chai", "1"),
            &line("C D", "France", "Western Europe", "Chai", "1"),
            &line("E F", "Italy", "Southern Europe", "Chai", "1"),
        ]);

        let names: Vec<_> = derive_regions(&recs).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Southern Europe", "Western Europe"]);
    }

    #[test]
    fn test_countries_drop_unknown_region() {
        let recs = records(&[
            &line("A B", "Spain", "Southern Europe", "Chai", "1"),
            &line("C D", "Narnia", "Nowhere", "Chai", "1"),
            &line("E F", "France", "Western Europe", "Chai", "1"),
        ]);
        let regions = ids("region", &["Southern Europe", "Western Europe"]);

        let countries = derive_countries(&recs, &regions);
        assert_eq!(
            countries,
            vec![
                NewCountry { name: "France".to_string(), region_id: 2 },
                NewCountry { name: "Spain".to_string(), region_id: 1 },
            ]
        );
    }

    #[test]
    fn test_country_takes_first_resolvable_region() {
        let recs = records(&[
            &line("A B", "France", "Nowhere", "Chai", "1"),
            &line("C D", "France", "Western Europe", "Chai", "1"),
            &line("E F", "France", "Southern Europe", "Chai", "1"),
        ]);
        let regions = ids("region", &["Southern Europe", "Western Europe"]);

        let countries = derive_countries(&recs, &regions);
        assert_eq!(countries, vec![NewCountry { name: "France".to_string(), region_id: 2 }]);
    }

    #[test]
    fn test_customers_deduplicated_filtered_and_sorted_by_first_name() {
        let recs = records(&[
            &line("Zoe Adams", "France", "Western Europe", "Chai", "1"),
            &line("Adam Zane", "France", "Western Europe", "Chai", "1"),
            &line("Zoe Adams", "France", "Western Europe", "Tofu", "2"),
            &line("Lost Soul", "Narnia", "Nowhere", "Chai", "1"),
        ]);
        let countries = ids("country", &["France"]);

        let customers = derive_customers(&recs, &countries);
        let names: Vec<_> = customers
            .iter()
            .map(|c| (c.first_name.as_str(), c.last_name.as_str()))
            .collect();
        assert_eq!(names, vec![("Adam", "Zane"), ("Zoe", "Adams")]);
        assert!(customers.iter().all(|c| c.country_id == 1));
    }

    #[test]
    fn test_categories_unique_sorted_first_description_wins() {
        let recs = records(&[
            "A B\t1 Main St\tTown\tFrance\tWestern Europe\tChai;Tofu\t2;1\tProduce;Beverages\t1;2\t1;1\t20210101;20210101",
            "C D\t1 Main St\tTown\tFrance\tWestern Europe\tChang\t1\tDrinks\t3\t1\t20210101",
        ]);

        let categories = derive_product_categories(&recs);
        assert_eq!(
            categories,
            vec![
                NewProductCategory { code: "1".to_string(), description: "Beverages".to_string() },
                NewProductCategory { code: "2".to_string(), description: "Produce".to_string() },
            ]
        );
    }

    #[test]
    fn test_products_unique_triples_sorted_by_name() {
        let recs = records(&[
            &line("A B", "France", "Western Europe", "Tofu;Chai", "2;1"),
            &line("C D", "France", "Western Europe", "Chai", "1"),
        ]);
        let categories = ids("productcategory", &["1", "2"]);

        let products = derive_products(&recs, &categories).unwrap();
        assert_eq!(
            products,
            vec![
                NewProduct { name: "Chai".to_string(), unit_price: 10.0, product_category_id: 1 },
                NewProduct { name: "Tofu".to_string(), unit_price: 10.0, product_category_id: 2 },
            ]
        );
    }

    #[test]
    fn test_product_with_unknown_category_is_fatal() {
        let recs = records(&[&line("A B", "France", "Western Europe", "Chai", "9")]);
        let categories = ids("productcategory", &["1"]);

        match derive_products(&recs, &categories) {
            Err(PipelineError::Lookup { table, key }) => {
                assert_eq!(table, "productcategory");
                assert_eq!(key, "9");
            }
            other => panic!("expected lookup error, got {:?}", other),
        }
    }
}
