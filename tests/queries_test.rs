//! Integration tests for the analytic query catalog

mod common;

use ordernorm::queries::{self, AnalyticQuery};
use ordernorm::PipelineError;

use common::{Fixture, JANE_DOE, ORDERS};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[test]
fn test_region_totals_single_order() {
    let fixture = Fixture::new(&[JANE_DOE]);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let output = queries::region_totals(&mut conn).unwrap();
    assert_eq!(output.sql, AnalyticQuery::RegionTotals.sql());
    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.rows[0].region, "Western Europe");
    assert_eq!(output.rows[0].total, 296.25);
}

#[test]
fn test_customer_total_matches_sum_of_lines() {
    let fixture = Fixture::new(&ORDERS);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    for name in ["Jane Doe", "Hans Muller", "Ana Trujillo"] {
        let lines = queries::customer_order_lines(&mut conn, name).unwrap();
        let total = queries::customer_total(&mut conn, name).unwrap();

        assert!(lines.rows.iter().all(|l| l.name == name));
        assert_eq!(total.rows.len(), 1);
        let line_sum = round2(lines.rows.iter().map(|l| l.total).sum());
        assert_eq!(round2(total.rows[0].total), line_sum, "{}", name);
    }

    let jane = queries::customer_order_lines(&mut conn, "Jane Doe").unwrap();
    let lines: Vec<_> = jane
        .rows
        .iter()
        .map(|l| (l.product_name.as_str(), l.order_date.as_str(), l.quantity_ordered, l.total))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("Chai", "2021-01-01", 10, 180.0),
            ("Tofu", "2021-01-05", 5, 116.25),
            ("Chang", "2021-02-01", 1, 19.0),
        ]
    );
}

#[test]
fn test_unknown_customer_is_lookup_error() {
    let fixture = Fixture::new(&[JANE_DOE]);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let err = queries::customer_total(&mut conn, "John Smith").unwrap_err();
    assert!(matches!(err, PipelineError::Lookup { table: "customer", .. }));
}

#[test]
fn test_customer_region_and_country_totals() {
    let fixture = Fixture::new(&ORDERS);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let customers: Vec<_> = queries::customer_totals(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.name, r.total))
        .collect();
    assert_eq!(
        customers,
        vec![
            ("Hans Muller".to_string(), 360.0),
            ("Jane Doe".to_string(), 315.25),
            ("Ana Trujillo".to_string(), 150.0),
        ]
    );

    let regions: Vec<_> = queries::region_totals(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.region, r.total))
        .collect();
    assert_eq!(
        regions,
        vec![
            ("Western Europe".to_string(), 675.25),
            ("Central America".to_string(), 150.0),
        ]
    );

    let countries: Vec<_> = queries::country_totals(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.country, r.country_total))
        .collect();
    assert_eq!(
        countries,
        vec![
            ("Germany".to_string(), 360.0),
            ("France".to_string(), 315.0),
            ("Mexico".to_string(), 150.0),
        ]
    );
}

#[test]
fn test_country_ranks_within_region() {
    let fixture = Fixture::new(&ORDERS);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let ranks: Vec<_> = queries::country_regional_ranks(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.region, r.country, r.country_regional_rank))
        .collect();
    assert_eq!(
        ranks,
        vec![
            ("Central America".to_string(), "Mexico".to_string(), 1),
            ("Western Europe".to_string(), "Germany".to_string(), 1),
            ("Western Europe".to_string(), "France".to_string(), 2),
        ]
    );

    let top: Vec<_> = queries::top_country_per_region(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| r.country)
        .collect();
    assert_eq!(top, vec!["Mexico", "Germany"]);
}

#[test]
fn test_quarterly_and_monthly_sales() {
    let fixture = Fixture::new(&ORDERS);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let quarters: Vec<_> = queries::quarterly_customer_sales(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.quarter, r.year, r.customer_id, r.total))
        .collect();
    assert_eq!(
        quarters,
        vec![
            ("Q1".to_string(), 2021, 3, 315.0),
            ("Q2".to_string(), 2021, 2, 360.0),
            ("Q3".to_string(), 2021, 1, 93.0),
            ("Q4".to_string(), 2021, 1, 57.0),
        ]
    );

    let top = queries::top_quarterly_customers(&mut conn).unwrap();
    assert_eq!(top.rows.len(), 4);
    assert!(top.rows.iter().all(|r| r.customer_rank == 1));

    let months: Vec<_> = queries::monthly_sales_rank(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.month, r.total, r.total_rank))
        .collect();
    assert_eq!(
        months,
        vec![
            ("April".to_string(), 360.0, 1),
            ("January".to_string(), 296.0, 2),
            ("July".to_string(), 93.0, 3),
            ("October".to_string(), 57.0, 4),
            ("February".to_string(), 19.0, 5),
        ]
    );
}

#[test]
fn test_max_days_without_order_is_largest_single_gap() {
    // Orders 10, 25 and 40 days apart
    let fixture = Fixture::new(&[
        "Gap Tester\t1 Road\tLyon\tFrance\tWestern Europe\tChai;Chai;Chai;Chai\t1;1;1;1\tBeverages;Beverages;Beverages;Beverages\t18.00;18.00;18.00;18.00\t1;1;1;1\t20210101;20210111;20210205;20210317",
    ]);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let gaps = queries::max_days_without_order(&mut conn).unwrap().rows;
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].first_name, "Gap");
    assert_eq!(gaps[0].country, "France");
    assert_eq!(gaps[0].max_days_without_order, Some(40.0));
    assert_eq!(gaps[0].order_date, "2021-03-17");
    assert_eq!(gaps[0].previous_order_date.as_deref(), Some("2021-02-05"));
}

#[test]
fn test_max_days_without_order_across_customers() {
    let fixture = Fixture::new(&ORDERS);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    let gaps: Vec<_> = queries::max_days_without_order(&mut conn)
        .unwrap()
        .rows
        .into_iter()
        .map(|r| (r.first_name, r.max_days_without_order))
        .collect();
    assert_eq!(
        gaps,
        vec![
            ("Ana".to_string(), Some(106.0)),
            ("Jane".to_string(), Some(27.0)),
            ("Hans".to_string(), None),
        ]
    );
}

#[test]
fn test_run_json_dispatches_every_catalog_entry() {
    let fixture = Fixture::new(&ORDERS);
    let pipeline = fixture.load();
    let mut conn = pipeline.database().get_connection().unwrap();

    for query in AnalyticQuery::ALL {
        let output = queries::run_json(&mut conn, query, Some("Jane Doe")).unwrap();
        assert_eq!(output["sql"], query.sql(), "{}", query);
        assert!(output["rows"].as_array().map_or(false, |rows| !rows.is_empty()), "{}", query);
    }

    let err = queries::run_json(&mut conn, AnalyticQuery::CustomerTotal, None).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
