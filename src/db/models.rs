//! Diesel models for the normalized tables
//!
//! `New*` structs are the rows builders insert (the surrogate key is assigned by
//! SQLite); the plain structs are what reads return.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema::*;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Insertable)]
#[diesel(table_name = region)]
pub struct NewRegion {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = region)]
pub struct Region {
    pub region_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = country)]
pub struct NewCountry {
    pub name: String,
    pub region_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = country)]
pub struct Country {
    pub country_id: i32,
    pub name: String,
    pub region_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = customer)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub country_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = customer)]
pub struct Customer {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub country_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = product_category)]
pub struct NewProductCategory {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = product_category)]
pub struct ProductCategory {
    pub product_category_id: i32,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = product)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: f64,
    pub product_category_id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = product)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub unit_price: f64,
    pub product_category_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = order_detail)]
pub struct NewOrderDetail {
    pub customer_id: i32,
    pub product_id: i32,
    /// `YYYY-MM-DD`
    pub order_date: String,
    pub quantity_ordered: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = order_detail)]
pub struct OrderDetail {
    pub order_id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub order_date: String,
    pub quantity_ordered: i32,
}
