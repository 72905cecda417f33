// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use carledger::aggregate::{UNKNOWN_CAR, UNKNOWN_CATEGORY};
use carledger::commands::overview;
use carledger::db;
use carledger::session::Session;
use carledger::store::{RecordStore, SqliteStore};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde_json::json;

fn setup() -> (Connection, Session) {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    store.insert_profile("anna@example.com", None).unwrap();
    let session = Session::sign_in(&store, "anna@example.com").unwrap();
    conn.execute(
        "INSERT INTO cars(id, user_id, name) VALUES (1, ?1, 'Volvo'), (2, ?1, 'Saab')",
        params![session.user_id],
    )
    .unwrap();
    (conn, session)
}

fn cat(conn: &Connection, slug: &str) -> i64 {
    conn.query_row(
        "SELECT id FROM expense_categories WHERE slug=?1",
        params![slug],
        |r| r.get(0),
    )
    .unwrap()
}

fn add(conn: &Connection, session: &Session, car: i64, category: i64, amount: &str) {
    add_on(conn, session, car, category, amount, "2025-01-01");
}

fn add_on(
    conn: &Connection,
    session: &Session,
    car: i64,
    category: i64,
    amount: &str,
    date: &str,
) {
    conn.execute(
        "INSERT INTO expenses(user_id, car_id, category_id, amount, currency, date) VALUES (?1, ?2, ?3, ?4, 'SEK', ?5)",
        params![session.user_id, car, category, amount, date],
    )
    .unwrap();
}

fn labels(sums: &[carledger::aggregate::LabelSum]) -> Vec<(String, String)> {
    sums.iter()
        .map(|s| (s.label.clone(), s.total.normalize().to_string()))
        .collect()
}

fn pair(label: &str, total: &str) -> (String, String) {
    (label.to_string(), total.to_string())
}

#[test]
fn no_expenses_gives_zero_total_and_empty_lists() {
    let (conn, session) = setup();
    let s = overview::summarize(&conn, &session).unwrap();
    assert_eq!(s.total, Decimal::ZERO);
    assert!(s.by_category.is_empty());
    assert!(s.by_car.is_empty());
}

#[test]
fn fuel_and_service_across_two_cars() {
    let (conn, session) = setup();
    let fuel = cat(&conn, "fuel");
    let service = cat(&conn, "service");
    add(&conn, &session, 1, fuel, "100");
    add(&conn, &session, 1, fuel, "50");
    add(&conn, &session, 2, service, "30");

    let s = overview::summarize(&conn, &session).unwrap();
    assert_eq!(s.total, Decimal::from(180));
    assert_eq!(
        labels(&s.by_category),
        [pair("Fuel", "150"), pair("Service", "30")]
    );
    assert_eq!(labels(&s.by_car), [pair("Volvo", "150"), pair("Saab", "30")]);

    assert_eq!(
        serde_json::to_value(&s).unwrap(),
        json!({
            "total": 180.0,
            "byCategory": [{"label": "Fuel", "total": 150.0}, {"label": "Service", "total": 30.0}],
            "byCar": [{"label": "Volvo", "total": 150.0}, {"label": "Saab", "total": 30.0}]
        })
    );
}

#[test]
fn dangling_category_lands_in_unknown_bucket() {
    let (conn, session) = setup();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    add(&conn, &session, 1, 4242, "75.5");
    let s = overview::summarize(&conn, &session).unwrap();
    assert_eq!(labels(&s.by_category), [pair(UNKNOWN_CATEGORY, "75.5")]);
    assert_eq!(labels(&s.by_car), [pair("Volvo", "75.5")]);

    add(&conn, &session, 77, cat(&conn, "fuel"), "1");
    let s = overview::summarize(&conn, &session).unwrap();
    assert_eq!(
        labels(&s.by_car),
        [pair("Volvo", "75.5"), pair(UNKNOWN_CAR, "1")]
    );
}

#[test]
fn equal_subtotals_keep_insertion_order() {
    let (conn, session) = setup();
    let parking = cat(&conn, "parking");
    let tolls = cat(&conn, "tolls");
    add(&conn, &session, 1, parking, "20");
    add(&conn, &session, 1, tolls, "20");
    let s = overview::summarize(&conn, &session).unwrap();
    assert_eq!(
        labels(&s.by_category),
        [pair("Parking", "20"), pair("Tolls", "20")]
    );
}

#[test]
fn equal_subtotals_on_later_dates_still_follow_insertion_order() {
    let (conn, session) = setup();
    let parking = cat(&conn, "parking");
    let tolls = cat(&conn, "tolls");
    add_on(&conn, &session, 1, parking, "20", "2025-01-01");
    add_on(&conn, &session, 2, tolls, "20", "2025-02-01");
    let s = overview::summarize(&conn, &session).unwrap();
    assert_eq!(
        labels(&s.by_category),
        [pair("Parking", "20"), pair("Tolls", "20")]
    );
    assert_eq!(labels(&s.by_car), [pair("Volvo", "20"), pair("Saab", "20")]);
}

#[test]
fn every_expense_is_counted_once_per_breakdown() {
    let (conn, session) = setup();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    let amounts = ["12.34", "0.01", "999.99", "45", "3.5", "7.25"];
    let cats = [cat(&conn, "fuel"), 5000, cat(&conn, "wash")];
    for (i, a) in amounts.iter().enumerate() {
        let car = [1, 2, 300][i % 3];
        add(&conn, &session, car, cats[(i + 1) % 3], a);
    }
    let s = overview::summarize(&conn, &session).unwrap();
    let expected: Decimal = amounts.iter().map(|a| a.parse::<Decimal>().unwrap()).sum();
    assert_eq!(s.total, expected);
    assert_eq!(s.by_category.iter().map(|c| c.total).sum::<Decimal>(), expected);
    assert_eq!(s.by_car.iter().map(|c| c.total).sum::<Decimal>(), expected);
    assert!(s.by_category.windows(2).all(|w| w[0].total >= w[1].total));
    assert!(s.by_car.windows(2).all(|w| w[0].total >= w[1].total));
}
