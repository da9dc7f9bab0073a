//! Propiedades de la limpieza sobre tablas pequeñas pero realistas.

use flow_adapters::steps::basic_cleaning::is_missing;
use flow_adapters::{clean_table, CleaningError, Table};

const LISTINGS: &str = "\
id,name,neighbourhood,price,minimum_nights
1,Cozy room,Harlem,80,1
2,Loft,SoHo,,2
3,Studio,Astoria,9,3
1,Cozy room,Harlem,80,1
4,Penthouse,Tribeca,450,NA
5,Basement,Bronx,10,1
6,\"Big, bright\",Chelsea,120.5,2
5,Basement,Bronx,10,1
";

fn listings() -> Table {
    Table::from_reader(LISTINGS.as_bytes()).unwrap()
}

#[test]
fn output_has_no_duplicates_no_missing_and_respects_threshold() {
    let out = clean_table(listings(), "price", 10.0).unwrap();

    let mut rows = out.rows.clone();
    rows.sort();
    rows.dedup();
    assert_eq!(rows.len(), out.rows.len());
    assert!(out.rows.iter().flatten().all(|f| !is_missing(f)));
    assert!(out.column("price").unwrap().all(|v| v.parse::<f64>().unwrap() >= 10.0));
    let ids: Vec<&str> = out.column("id").unwrap().collect();
    assert_eq!(ids, vec!["1", "5", "6"]);
    assert_eq!(out.headers, listings().headers);
}

#[test]
fn cleaning_is_idempotent() {
    let once = clean_table(listings(), "price", 10.0).unwrap();
    let twice = clean_table(once.clone(), "price", 10.0).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn threshold_above_every_value_leaves_only_the_header() {
    let out = clean_table(listings(), "price", 1_000.0).unwrap();
    assert!(out.is_empty());
    let mut buf = Vec::new();
    out.to_writer(&mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "id,name,neighbourhood,price,minimum_nights\n");
}

#[test]
fn missing_filter_column_is_reported() {
    let err = clean_table(listings(), "last_review", 0.0).unwrap_err();
    assert!(matches!(err, CleaningError::MissingColumn(ref c) if c == "last_review"));
}

#[test]
fn missing_values_are_dropped_before_parsing() {
    // "NA" en price no debe llegar al parseo numérico
    let t = Table::from_reader("id,price\n1,NA\n2,15\n".as_bytes()).unwrap();
    let out = clean_table(t, "price", 0.0).unwrap();
    assert_eq!(out.len(), 1);
}
