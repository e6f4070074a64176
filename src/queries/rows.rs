//! Typed result rows for each analytic query.

use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text};
use diesel::QueryableByName;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct CustomerOrderLine {
    #[diesel(sql_type = Text, column_name = Name)]
    pub name: String,
    #[diesel(sql_type = Text, column_name = ProductName)]
    pub product_name: String,
    #[diesel(sql_type = Text, column_name = OrderDate)]
    pub order_date: String,
    #[diesel(sql_type = Double, column_name = ProductUnitPrice)]
    pub product_unit_price: f64,
    #[diesel(sql_type = Integer, column_name = QuantityOrdered)]
    pub quantity_ordered: i32,
    #[diesel(sql_type = Double, column_name = Total)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct CustomerTotal {
    #[diesel(sql_type = Text, column_name = Name)]
    pub name: String,
    #[diesel(sql_type = Double, column_name = Total)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct RegionTotal {
    #[diesel(sql_type = Text, column_name = Region)]
    pub region: String,
    #[diesel(sql_type = Double, column_name = Total)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct CountryTotal {
    #[diesel(sql_type = Text, column_name = Country)]
    pub country: String,
    #[diesel(sql_type = Double, column_name = CountryTotal)]
    pub country_total: f64,
}

/// A country ranked by order total within its region
#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct CountryRegionalRank {
    #[diesel(sql_type = Text, column_name = Region)]
    pub region: String,
    #[diesel(sql_type = Text, column_name = Country)]
    pub country: String,
    #[diesel(sql_type = Double, column_name = CountryTotal)]
    pub country_total: f64,
    #[diesel(sql_type = BigInt, column_name = CountryRegionalRank)]
    pub country_regional_rank: i64,
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct QuarterlySales {
    #[diesel(sql_type = Text, column_name = Quarter)]
    pub quarter: String,
    #[diesel(sql_type = Integer, column_name = Year)]
    pub year: i32,
    #[diesel(sql_type = Integer, column_name = CustomerID)]
    pub customer_id: i32,
    #[diesel(sql_type = Double, column_name = Total)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct RankedQuarterlySales {
    #[diesel(sql_type = Text, column_name = Quarter)]
    pub quarter: String,
    #[diesel(sql_type = Integer, column_name = Year)]
    pub year: i32,
    #[diesel(sql_type = Integer, column_name = CustomerID)]
    pub customer_id: i32,
    #[diesel(sql_type = Double, column_name = Total)]
    pub total: f64,
    #[diesel(sql_type = BigInt, column_name = CustomerRank)]
    pub customer_rank: i64,
}

#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct MonthlySales {
    #[diesel(sql_type = Text, column_name = Month)]
    pub month: String,
    #[diesel(sql_type = Double, column_name = Total)]
    pub total: f64,
    #[diesel(sql_type = BigInt, column_name = TotalRank)]
    pub total_rank: i64,
}

/// Longest gap between consecutive orders of one customer.
///
/// `order_date`/`previous_order_date` bound the longest gap; both gap fields
/// are `None` for a customer with a single order date.
#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct OrderGap {
    #[diesel(sql_type = Integer, column_name = CustomerID)]
    pub customer_id: i32,
    #[diesel(sql_type = Text, column_name = FirstName)]
    pub first_name: String,
    #[diesel(sql_type = Text, column_name = LastName)]
    pub last_name: String,
    #[diesel(sql_type = Text, column_name = Country)]
    pub country: String,
    #[diesel(sql_type = Text, column_name = OrderDate)]
    pub order_date: String,
    #[diesel(sql_type = Nullable<Text>, column_name = PreviousOrderDate)]
    pub previous_order_date: Option<String>,
    #[diesel(sql_type = Nullable<Double>, column_name = MaxDaysWithoutOrder)]
    pub max_days_without_order: Option<f64>,
}
