//! Query library: a fixed catalog of analytic queries over the normalized schema.
//!
//! The SQL lives in [`sql`] as plain text; each query function binds its
//! parameters, runs the statement and returns the text together with typed
//! rows. [`run_json`] dispatches by catalog name for the CLI.

pub mod rows;
pub mod sql;

use std::fmt;
use std::str::FromStr;

use diesel::prelude::*;
use diesel::sql_types::Integer;
use indexmap::IndexMap;
use serde::Serialize;

use crate::db::DbConnection;
use crate::error::PipelineError;
use crate::lookup;

pub use rows::*;

/// Every query in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticQuery {
    CustomerOrderLines,
    CustomerTotal,
    CustomerTotals,
    RegionTotals,
    CountryTotals,
    CountryRegionalRanks,
    TopCountryPerRegion,
    QuarterlyCustomerSales,
    TopQuarterlyCustomers,
    MonthlySalesRank,
    MaxDaysWithoutOrder,
}

impl AnalyticQuery {
    pub const ALL: [AnalyticQuery; 11] = [
        AnalyticQuery::CustomerOrderLines,
        AnalyticQuery::CustomerTotal,
        AnalyticQuery::CustomerTotals,
        AnalyticQuery::RegionTotals,
        AnalyticQuery::CountryTotals,
        AnalyticQuery::CountryRegionalRanks,
        AnalyticQuery::TopCountryPerRegion,
        AnalyticQuery::QuarterlyCustomerSales,
        AnalyticQuery::TopQuarterlyCustomers,
        AnalyticQuery::MonthlySalesRank,
        AnalyticQuery::MaxDaysWithoutOrder,
    ];

    /// Catalog name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticQuery::CustomerOrderLines => "customer-order-lines",
            AnalyticQuery::CustomerTotal => "customer-total",
            AnalyticQuery::CustomerTotals => "customer-totals",
            AnalyticQuery::RegionTotals => "region-totals",
            AnalyticQuery::CountryTotals => "country-totals",
            AnalyticQuery::CountryRegionalRanks => "country-regional-ranks",
            AnalyticQuery::TopCountryPerRegion => "top-country-per-region",
            AnalyticQuery::QuarterlyCustomerSales => "quarterly-customer-sales",
            AnalyticQuery::TopQuarterlyCustomers => "top-quarterly-customers",
            AnalyticQuery::MonthlySalesRank => "monthly-sales-rank",
            AnalyticQuery::MaxDaysWithoutOrder => "max-days-without-order",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            AnalyticQuery::CustomerOrderLines => sql::CUSTOMER_ORDER_LINES,
            AnalyticQuery::CustomerTotal => sql::CUSTOMER_TOTAL,
            AnalyticQuery::CustomerTotals => sql::CUSTOMER_TOTALS,
            AnalyticQuery::RegionTotals => sql::REGION_TOTALS,
            AnalyticQuery::CountryTotals => sql::COUNTRY_TOTALS,
            AnalyticQuery::CountryRegionalRanks => sql::COUNTRY_REGIONAL_RANKS,
            AnalyticQuery::TopCountryPerRegion => sql::TOP_COUNTRY_PER_REGION,
            AnalyticQuery::QuarterlyCustomerSales => sql::QUARTERLY_CUSTOMER_SALES,
            AnalyticQuery::TopQuarterlyCustomers => sql::TOP_QUARTERLY_CUSTOMERS,
            AnalyticQuery::MonthlySalesRank => sql::MONTHLY_SALES_RANK,
            AnalyticQuery::MaxDaysWithoutOrder => sql::MAX_DAYS_WITHOUT_ORDER,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalyticQuery::CustomerOrderLines => "Every order line of one customer with its line total",
            AnalyticQuery::CustomerTotal => "Order total of one customer",
            AnalyticQuery::CustomerTotals => "Order total per customer, largest first",
            AnalyticQuery::RegionTotals => "Order total per region, largest first",
            AnalyticQuery::CountryTotals => "Order total per country, largest first",
            AnalyticQuery::CountryRegionalRanks => "Countries ranked by order total within their region",
            AnalyticQuery::TopCountryPerRegion => "Top-ranked country of each region",
            AnalyticQuery::QuarterlyCustomerSales => "Customer sales per quarter and year",
            AnalyticQuery::TopQuarterlyCustomers => "Top 5 customers of each quarter and year",
            AnalyticQuery::MonthlySalesRank => "Calendar months ranked by sales",
            AnalyticQuery::MaxDaysWithoutOrder => "Longest gap between consecutive orders per customer",
        }
    }

    /// Whether the query binds a customer
    pub fn needs_customer(&self) -> bool {
        matches!(
            self,
            AnalyticQuery::CustomerOrderLines | AnalyticQuery::CustomerTotal
        )
    }
}

impl fmt::Display for AnalyticQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AnalyticQuery {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyticQuery::ALL
            .iter()
            .copied()
            .find(|q| q.name() == s)
            .ok_or_else(|| PipelineError::UnknownQuery(s.to_string()))
    }
}

/// Catalog as data: query name -> SQL text, in catalog order
pub fn catalog() -> IndexMap<&'static str, &'static str> {
    AnalyticQuery::ALL.iter().map(|q| (q.name(), q.sql())).collect()
}

/// SQL text that was executed plus its materialized rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput<R> {
    pub sql: &'static str,
    pub rows: Vec<R>,
}

impl<R> QueryOutput<R> {
    fn new(query: AnalyticQuery, rows: Vec<R>) -> Self {
        tracing::debug!("Query {} returned {} rows", query, rows.len());
        Self {
            sql: query.sql(),
            rows,
        }
    }
}

/// Order lines of the customer named "First Last"
pub fn customer_order_lines(
    conn: &mut DbConnection,
    customer_name: &str,
) -> Result<QueryOutput<CustomerOrderLine>, PipelineError> {
    let customer_id = lookup::customer_ids(conn)?.resolve(customer_name)?;
    let query = AnalyticQuery::CustomerOrderLines;
    let rows = diesel::sql_query(query.sql())
        .bind::<Integer, _>(customer_id)
        .load::<CustomerOrderLine>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

/// Order total of the customer named "First Last"
pub fn customer_total(
    conn: &mut DbConnection,
    customer_name: &str,
) -> Result<QueryOutput<CustomerTotal>, PipelineError> {
    let customer_id = lookup::customer_ids(conn)?.resolve(customer_name)?;
    let query = AnalyticQuery::CustomerTotal;
    let rows = diesel::sql_query(query.sql())
        .bind::<Integer, _>(customer_id)
        .load::<CustomerTotal>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn customer_totals(conn: &mut DbConnection) -> Result<QueryOutput<CustomerTotal>, PipelineError> {
    let query = AnalyticQuery::CustomerTotals;
    let rows = diesel::sql_query(query.sql()).load::<CustomerTotal>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn region_totals(conn: &mut DbConnection) -> Result<QueryOutput<RegionTotal>, PipelineError> {
    let query = AnalyticQuery::RegionTotals;
    let rows = diesel::sql_query(query.sql()).load::<RegionTotal>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn country_totals(conn: &mut DbConnection) -> Result<QueryOutput<CountryTotal>, PipelineError> {
    let query = AnalyticQuery::CountryTotals;
    let rows = diesel::sql_query(query.sql()).load::<CountryTotal>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn country_regional_ranks(
    conn: &mut DbConnection,
) -> Result<QueryOutput<CountryRegionalRank>, PipelineError> {
    let query = AnalyticQuery::CountryRegionalRanks;
    let rows = diesel::sql_query(query.sql()).load::<CountryRegionalRank>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn top_country_per_region(
    conn: &mut DbConnection,
) -> Result<QueryOutput<CountryRegionalRank>, PipelineError> {
    let query = AnalyticQuery::TopCountryPerRegion;
    let rows = diesel::sql_query(query.sql()).load::<CountryRegionalRank>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn quarterly_customer_sales(
    conn: &mut DbConnection,
) -> Result<QueryOutput<QuarterlySales>, PipelineError> {
    let query = AnalyticQuery::QuarterlyCustomerSales;
    let rows = diesel::sql_query(query.sql()).load::<QuarterlySales>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn top_quarterly_customers(
    conn: &mut DbConnection,
) -> Result<QueryOutput<RankedQuarterlySales>, PipelineError> {
    let query = AnalyticQuery::TopQuarterlyCustomers;
    let rows = diesel::sql_query(query.sql()).load::<RankedQuarterlySales>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn monthly_sales_rank(conn: &mut DbConnection) -> Result<QueryOutput<MonthlySales>, PipelineError> {
    let query = AnalyticQuery::MonthlySalesRank;
    let rows = diesel::sql_query(query.sql()).load::<MonthlySales>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

pub fn max_days_without_order(conn: &mut DbConnection) -> Result<QueryOutput<OrderGap>, PipelineError> {
    let query = AnalyticQuery::MaxDaysWithoutOrder;
    let rows = diesel::sql_query(query.sql()).load::<OrderGap>(conn)?;
    Ok(QueryOutput::new(query, rows))
}

fn to_json<R: Serialize>(output: QueryOutput<R>) -> Result<serde_json::Value, PipelineError> {
    Ok(serde_json::to_value(output)?)
}

/// Run a catalog query by value and return `{"sql": ..., "rows": [...]}`.
///
/// `customer` is required for customer-scoped queries and ignored otherwise.
pub fn run_json(
    conn: &mut DbConnection,
    query: AnalyticQuery,
    customer: Option<&str>,
) -> Result<serde_json::Value, PipelineError> {
    let require_customer = || {
        customer.ok_or_else(|| {
            PipelineError::Config(format!("Query '{}' requires a customer name", query))
        })
    };

    match query {
        AnalyticQuery::CustomerOrderLines => to_json(customer_order_lines(conn, require_customer()?)?),
        AnalyticQuery::CustomerTotal => to_json(customer_total(conn, require_customer()?)?),
        AnalyticQuery::CustomerTotals => to_json(customer_totals(conn)?),
        AnalyticQuery::RegionTotals => to_json(region_totals(conn)?),
        AnalyticQuery::CountryTotals => to_json(country_totals(conn)?),
        AnalyticQuery::CountryRegionalRanks => to_json(country_regional_ranks(conn)?),
        AnalyticQuery::TopCountryPerRegion => to_json(top_country_per_region(conn)?),
        AnalyticQuery::QuarterlyCustomerSales => to_json(quarterly_customer_sales(conn)?),
        AnalyticQuery::TopQuarterlyCustomers => to_json(top_quarterly_customers(conn)?),
        AnalyticQuery::MonthlySalesRank => to_json(monthly_sales_rank(conn)?),
        AnalyticQuery::MaxDaysWithoutOrder => to_json(max_days_without_order(conn)?),
    }
}
