// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use crate::store::{RecordStore, SqliteStore};
use crate::utils::pretty_table;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub
                .get_one::<String>("email")
                .map(|s| s.trim())
                .unwrap_or_default();
            if email.is_empty() {
                return Err(ValidationError::MissingEmail.into());
            }
            let name = sub
                .get_one::<String>("name")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            store
                .insert_profile(email, name)
                .with_context(|| format!("Could not add profile '{}'", email))?;
            println!("Added profile '{}'", email);
        }
        Some(("list", _)) => {
            let data = store
                .list_profiles()?
                .into_iter()
                .map(|p| {
                    vec![
                        p.email,
                        p.display_name.unwrap_or_default(),
                        p.created_at.to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["E-mail", "Name", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
