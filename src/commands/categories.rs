// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{RecordStore, SqliteStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let store = SqliteStore::new(conn);
        let cats = store.list_categories()?;
        if !maybe_print_json(sub.get_flag("json"), &cats)? {
            let data = cats
                .into_iter()
                .map(|c| vec![c.name, c.slug.unwrap_or_default()])
                .collect();
            println!("{}", pretty_table(&["Category", "Slug"], data));
        }
    }
    Ok(())
}
