//! Lookup resolvers: natural key -> surrogate id, read back from the database.
//!
//! Every resolver queries the table on each call. Nothing is cached, so a map
//! always reflects the rows currently persisted.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::db::schema::{country, customer, product, product_category, region};
use crate::db::DbConnection;
use crate::error::PipelineError;
use crate::record::customer_key;

/// Mapping from a dimension's natural key to its surrogate id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupMap {
    table: &'static str,
    ids: HashMap<String, i32>,
}

impl LookupMap {
    /// Build a map from `(key, id)` pairs. Later pairs win on duplicate keys.
    pub fn from_pairs<I>(table: &'static str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, i32)>,
    {
        Self {
            table,
            ids: pairs.into_iter().collect(),
        }
    }

    /// Optional lookup, for builders that silently drop unresolved rows
    pub fn get(&self, key: &str) -> Option<i32> {
        self.ids.get(key).copied()
    }

    /// Required lookup: an unknown key is an error, never a default
    pub fn resolve(&self, key: &str) -> Result<i32, PipelineError> {
        self.get(key).ok_or_else(|| PipelineError::Lookup {
            table: self.table,
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ids.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Table the keys come from
    pub fn table(&self) -> &'static str {
        self.table
    }
}

/// Region name -> RegionID
pub fn region_ids(conn: &mut DbConnection) -> Result<LookupMap, PipelineError> {
    let rows = region::table
        .select((region::name, region::region_id))
        .order(region::region_id)
        .load::<(String, i32)>(conn)?;
    Ok(loaded("region", rows))
}

/// Country name -> CountryID
pub fn country_ids(conn: &mut DbConnection) -> Result<LookupMap, PipelineError> {
    let rows = country::table
        .select((country::name, country::country_id))
        .order(country::country_id)
        .load::<(String, i32)>(conn)?;
    Ok(loaded("country", rows))
}

/// "First Last" -> CustomerID
pub fn customer_ids(conn: &mut DbConnection) -> Result<LookupMap, PipelineError> {
    let rows = customer::table
        .select((customer::first_name, customer::last_name, customer::customer_id))
        .order(customer::customer_id)
        .load::<(String, String, i32)>(conn)?;
    let pairs = rows
        .into_iter()
        .map(|(first, last, id)| (customer_key(&first, &last), id))
        .collect();
    Ok(loaded("customer", pairs))
}

/// Category code -> ProductCategoryID
pub fn product_category_ids(conn: &mut DbConnection) -> Result<LookupMap, PipelineError> {
    let rows = product_category::table
        .select((product_category::code, product_category::product_category_id))
        .order(product_category::product_category_id)
        .load::<(String, i32)>(conn)?;
    Ok(loaded("productcategory", rows))
}

/// Product name -> ProductID. A name stored more than once maps to its highest id.
pub fn product_ids(conn: &mut DbConnection) -> Result<LookupMap, PipelineError> {
    let rows = product::table
        .select((product::name, product::product_id))
        .order(product::product_id)
        .load::<(String, i32)>(conn)?;
    Ok(loaded("product", rows))
}

fn loaded(table: &'static str, rows: Vec<(String, i32)>) -> LookupMap {
    let map = LookupMap::from_pairs(table, rows);
    tracing::debug!("Loaded {} keys from {}", map.len(), table);
    map
}
