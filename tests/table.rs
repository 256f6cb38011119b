use basket_sheets::table::{normalize, Cell, Table};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::{json, Value};

fn date(s: &str) -> Cell {
    Cell::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
}

#[test]
fn missing_normalizes_to_empty_string() {
    assert_eq!(normalize(&Cell::Missing), Value::String(String::new()));
}

#[test]
fn date_normalizes_to_iso_string() {
    assert_eq!(normalize(&date("2024-03-05")), json!("2024-03-05"));
}

#[test]
fn time_normalizes_to_hours_and_minutes() {
    let t = Cell::Time(NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    assert_eq!(normalize(&t), json!("14:30"));
}

#[test]
fn duration_normalizes_to_canonical_string() {
    let d = Cell::Duration(Duration::seconds(90 * 60 + 15));
    assert_eq!(normalize(&d), json!("1:30:15"));
    let negative = Cell::Duration(Duration::seconds(-61));
    assert_eq!(normalize(&negative), json!("-0:01:01"));
}

#[test]
fn scalars_pass_through_unchanged() {
    assert_eq!(normalize(&Cell::Number(42.5)), json!(42.5));
    assert_eq!(
        normalize(&Cell::Text("Lions".to_string())),
        json!("Lions")
    );
}

#[test]
fn push_const_column_appends_and_overwrites() {
    let mut table = Table::new(vec!["A".into()]);
    table.push_row(vec![Cell::Number(1.0)]);
    table.push_row(vec![Cell::Number(2.0)]);

    table.push_const_column("Team", Cell::Text("Men1".into()));
    assert_eq!(table.columns(), ["A", "Team"]);
    assert!(table
        .rows()
        .iter()
        .all(|r| r[1] == Cell::Text("Men1".into())));

    // Overwrites in place when the column already exists.
    table.push_const_column("Team", Cell::Text("Women1".into()));
    assert_eq!(table.columns(), ["A", "Team"]);
    assert!(table
        .rows()
        .iter()
        .all(|r| r[1] == Cell::Text("Women1".into())));
}

#[test]
fn derive_week_computes_iso_week_and_skips_non_dates() {
    let mut table = Table::new(vec!["Datum".into()]);
    table.push_row(vec![date("2024-01-01")]);
    table.push_row(vec![Cell::Missing]);
    table.derive_week("Datum", "Week");

    assert_eq!(table.columns(), ["Datum", "Week"]);
    assert_eq!(table.rows()[0][1], Cell::Number(1.0));
    assert_eq!(table.rows()[1][1], Cell::Missing);
}

#[test]
fn derive_week_is_a_noop_without_the_source_column() {
    let mut table = Table::new(vec!["Gegner".into()]);
    table.push_row(vec![Cell::Text("Lions".into())]);
    table.derive_week("Datum", "Week");
    assert_eq!(table.columns(), ["Gegner"]);
}

#[test]
fn concat_unions_columns_in_first_appearance_order() {
    let mut a = Table::new(vec!["Datum".into(), "Heim".into()]);
    a.push_row(vec![date("2024-03-05"), Cell::Text("yes".into())]);
    let mut b = Table::new(vec!["Datum".into(), "Halle".into()]);
    b.push_row(vec![date("2024-03-12"), Cell::Text("H1".into())]);

    let combined = Table::concat(vec![a, b]);
    assert_eq!(combined.columns(), ["Datum", "Heim", "Halle"]);
    assert_eq!(combined.len(), 2);
    // Cells a source table lacks come out missing.
    assert_eq!(combined.rows()[0][2], Cell::Missing);
    assert_eq!(combined.rows()[1][1], Cell::Missing);
}

#[test]
fn concat_keeps_duplicate_rows() {
    let mut a = Table::new(vec!["Datum".into()]);
    a.push_row(vec![date("2024-03-05")]);
    let b = a.clone();
    let combined = Table::concat(vec![a, b]);
    assert_eq!(combined.len(), 2);
}

#[test]
fn sort_by_column_is_stable_and_missing_sorts_last() {
    let mut table = Table::new(vec!["Datum".into(), "Tag".into()]);
    table.push_row(vec![date("2024-03-12"), Cell::Text("first".into())]);
    table.push_row(vec![Cell::Missing, Cell::Text("missing".into())]);
    table.push_row(vec![date("2024-03-05"), Cell::Text("second".into())]);
    table.push_row(vec![date("2024-03-05"), Cell::Text("third".into())]);

    table.sort_by_column("Datum");

    let tags: Vec<_> = table.rows().iter().map(|r| r[1].clone()).collect();
    assert_eq!(
        tags,
        vec![
            Cell::Text("second".into()),
            Cell::Text("third".into()),
            Cell::Text("first".into()),
            Cell::Text("missing".into()),
        ]
    );
}

#[test]
fn sort_by_absent_column_keeps_row_order() {
    let mut table = Table::new(vec!["Gegner".into()]);
    table.push_row(vec![Cell::Text("b".into())]);
    table.push_row(vec![Cell::Text("a".into())]);
    table.sort_by_column("Datum");
    assert_eq!(table.rows()[0][0], Cell::Text("b".into()));
}

#[test]
fn project_reorders_and_drops_columns() {
    let mut table = Table::new(vec!["A".into(), "B".into(), "C".into()]);
    table.push_row(vec![
        Cell::Number(1.0),
        Cell::Number(2.0),
        Cell::Number(3.0),
    ]);

    let projected = table.project(&["B".to_string(), "A".to_string()]);
    assert_eq!(projected.columns(), ["B", "A"]);
    assert_eq!(
        projected.rows()[0],
        vec![Cell::Number(2.0), Cell::Number(1.0)]
    );
}
