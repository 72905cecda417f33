// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::session::Session;
use crate::store::SqliteStore;

pub mod cars;
pub mod categories;
pub mod config;
pub mod expenses;
pub mod overview;
pub mod profiles;

/// Opens a session for the `--user` profile.
pub fn require_session(conn: &Connection, m: &clap::ArgMatches) -> Result<Session> {
    let email = m
        .get_one::<String>("user")
        .context("No user selected; pass --user <email> or set CARLEDGER_USER")?;
    let store = SqliteStore::new(conn);
    let session = Session::sign_in(&store, email)?;
    Ok(session)
}
