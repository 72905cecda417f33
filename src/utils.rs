// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

use crate::store::SqliteStore;

pub const DEFAULT_CURRENCY: &str = "SEK";

/// Accepts a decimal comma as well as a dot, e.g. `"12,50"`.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&normalized).ok())
}

/// Reads an amount column that may hold TEXT, INTEGER or REAL values.
pub fn decimal_from_sql(v: ValueRef<'_>) -> std::result::Result<Decimal, String> {
    match v {
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f).map_err(|_| f.to_string()),
        ValueRef::Text(t) => {
            let s = String::from_utf8_lossy(t).into_owned();
            parse_decimal(&s).ok_or(s)
        }
        ValueRef::Null => Err("NULL".into()),
        ValueRef::Blob(_) => Err("<blob>".into()),
    }
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{:.2} {}", d.round_dp(2), ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

// Deployment currency setting
pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(SqliteStore::new(conn).currency()?)
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

/// Asks a yes/no question; anything but `y`/`yes` counts as no.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
