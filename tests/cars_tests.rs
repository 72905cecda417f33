// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use carledger::commands::cars;
use carledger::error::ValidationError;
use carledger::session::Session;
use carledger::store::{RecordStore, SqliteStore};
use carledger::{cli, db};
use rusqlite::{Connection, params};

fn setup() -> (Connection, Session) {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    store.insert_profile("anna@example.com", None).unwrap();
    let session = Session::sign_in(&store, "anna@example.com").unwrap();
    (conn, session)
}

fn car_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["carledger", "car"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("car", m)) = matches.subcommand() {
        if let Some((_, leaf)) = m.subcommand() {
            return leaf.clone();
        }
    }
    panic!("car command not parsed");
}

#[test]
fn add_then_edit_keeps_untouched_fields() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let m = car_matches(&[
        "add", "--name", " Volvo V70 ", "--reg", "ABC 123", "--brand", "Volvo", "--year", "2007",
    ]);
    let id = cars::add(&store, &session, &m).unwrap();

    let id_s = id.to_string();
    let m = car_matches(&["edit", "--id", &id_s, "--model", "V70 II"]);
    cars::edit(&store, &session, &m).unwrap();

    let car = store.car(&session, id).unwrap();
    assert_eq!(car.name, "Volvo V70");
    assert_eq!(car.registration_number.as_deref(), Some("ABC 123"));
    assert_eq!(car.model.as_deref(), Some("V70 II"));
    assert_eq!(car.year, Some(2007));
}

#[test]
fn add_rejects_blank_name_and_bad_year() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let err = cars::add(&store, &session, &car_matches(&["add", "--name", "  "])).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::MissingCarName)
    );
    let err = cars::add(
        &store,
        &session,
        &car_matches(&["add", "--name", "Saab", "--year", "new"]),
    )
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::InvalidYear("new".into()))
    );
    assert!(store.list_cars(&session).unwrap().is_empty());
}

#[test]
fn rm_mentions_expense_count_and_cascades() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    let id = cars::add(&store, &session, &car_matches(&["add", "--name", "Volvo"])).unwrap();
    for amount in ["10", "20"] {
        conn.execute(
            "INSERT INTO expenses(user_id, car_id, category_id, amount, currency, date)
             VALUES (?1, ?2, (SELECT id FROM expense_categories WHERE slug='fuel'), ?3, 'SEK', '2025-01-01')",
            params![session.user_id, id, amount],
        )
        .unwrap();
    }

    let id_s = id.to_string();
    let mut out = Vec::new();
    let removed = cars::rm(
        &store,
        &session,
        &car_matches(&["rm", "--id", &id_s]),
        &mut "yes\n".as_bytes(),
        &mut out,
    )
    .unwrap();
    assert!(removed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Delete 'Volvo' and its 2 expense(s)?"));
    assert!(text.contains("Removed car 'Volvo'"));

    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
}

#[test]
fn rm_of_someone_elses_car_fails() {
    let (conn, session) = setup();
    let store = SqliteStore::new(&conn);
    store.insert_profile("bo@example.com", None).unwrap();
    let bo = Session::sign_in(&store, "bo@example.com").unwrap();
    let id = cars::add(&store, &bo, &car_matches(&["add", "--name", "Saab"])).unwrap();

    let id_s = id.to_string();
    let mut out = Vec::new();
    let res = cars::rm(
        &store,
        &session,
        &car_matches(&["rm", "--id", &id_s, "--yes"]),
        &mut "".as_bytes(),
        &mut out,
    );
    assert!(res.is_err());
    assert_eq!(store.list_cars(&bo).unwrap().len(), 1);
}
