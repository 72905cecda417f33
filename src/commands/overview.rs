// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{LabelSum, Summary};
use crate::loader::{OverviewLoader, View};
use crate::session::Session;
use crate::store::SqliteStore;
use crate::utils::{fmt_money, get_currency, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let summary = summarize(conn, session)?;
    if maybe_print_json(m.get_flag("json"), &summary)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    println!(
        "{}",
        pretty_table(
            &["Total (all expenses)"],
            vec![vec![fmt_money(&summary.total, &ccy)]],
        )
    );
    if summary.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }
    println!("Per category");
    println!("{}", pretty_table(&["Category", "Spent"], rows(&summary.by_category, &ccy)));
    println!("Per car");
    println!("{}", pretty_table(&["Car", "Spent"], rows(&summary.by_car, &ccy)));
    Ok(())
}

fn rows(sums: &[LabelSum], ccy: &str) -> Vec<Vec<String>> {
    sums.iter()
        .map(|s| vec![s.label.clone(), fmt_money(&s.total, ccy)])
        .collect()
}

/// Fetches the user's expenses and aggregates them.
pub fn summarize(conn: &Connection, session: &Session) -> Result<Summary> {
    let store = SqliteStore::new(conn);
    let mut view = View::new(OverviewLoader);
    view.load(&store, session)?;
    view.data()
        .cloned()
        .ok_or_else(|| anyhow!("Overview could not be loaded"))
}
