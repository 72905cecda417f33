// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use carledger::db;
use carledger::loader::{Applied, CarListLoader, OverviewLoader, Phase, View};
use carledger::session::Session;
use carledger::store::{RecordStore, SqliteStore};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> (Connection, Session) {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    store.insert_profile("anna@example.com", None).unwrap();
    let session = Session::sign_in(&store, "anna@example.com").unwrap();
    conn.execute(
        "INSERT INTO cars(id, user_id, name) VALUES (1, ?1, 'Volvo')",
        params![session.user_id],
    )
    .unwrap();
    (conn, session)
}

fn spend(conn: &Connection, session: &Session, amount: &str) {
    conn.execute(
        "INSERT INTO expenses(user_id, car_id, category_id, amount, currency, date)
         VALUES (?1, 1, (SELECT id FROM expense_categories WHERE slug='fuel'), ?2, 'SEK', '2025-01-01')",
        params![session.user_id, amount],
    )
    .unwrap();
}

#[test]
fn refresh_on_focus_picks_up_new_expenses() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let mut view = View::new(OverviewLoader);
    assert_eq!(view.phase(), Phase::Idle);

    assert_eq!(view.refresh(&store, &session), Applied::Updated);
    assert_eq!(view.data().unwrap().total, Decimal::ZERO);

    spend(&conn, &session, "40");
    assert_eq!(view.refresh(&store, &session), Applied::Updated);
    assert_eq!(view.data().unwrap().total, Decimal::from(40));
    assert_eq!(view.phase(), Phase::Loaded);
}

#[test]
fn response_after_blur_is_discarded() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let mut view = View::new(OverviewLoader);

    let ticket = view.focus();
    assert_eq!(view.phase(), Phase::Loading);
    let result = view.fetch(&ticket, &store, &session);
    view.blur();
    assert!(ticket.is_cancelled());
    assert_eq!(view.apply(ticket, result), Applied::Stale);
    assert!(view.data().is_none());
    assert_eq!(view.phase(), Phase::Idle);
}

#[test]
fn superseded_ticket_does_not_overwrite_newer_data() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let mut view = View::new(OverviewLoader);

    let old = view.focus();
    let old_result = view.fetch(&old, &store, &session);
    spend(&conn, &session, "15");
    let new = view.focus();
    assert!(old.is_cancelled());
    let new_result = view.fetch(&new, &store, &session);

    assert_eq!(view.apply(new, new_result), Applied::Updated);
    assert_eq!(view.apply(old, old_result), Applied::Stale);
    assert_eq!(view.data().unwrap().total, Decimal::from(15));
}

#[test]
fn failed_fetch_keeps_previous_data() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let mut view = View::new(CarListLoader);
    assert_eq!(view.refresh(&store, &session), Applied::Updated);
    assert_eq!(view.data().unwrap().len(), 1);

    conn.execute_batch("PRAGMA foreign_keys = OFF; DROP TABLE expenses; DROP TABLE cars;")
        .unwrap();
    assert_eq!(view.refresh(&store, &session), Applied::Failed);
    assert_eq!(view.data().unwrap().len(), 1);
    assert!(view.last_error().is_some());
    assert!(view.load(&store, &session).is_err());
}
