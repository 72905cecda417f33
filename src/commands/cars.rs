// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::loader::{CarListLoader, View};
use crate::session::Session;
use crate::store::{RecordStore, SqliteStore};
use crate::utils::{confirm, maybe_print_json, pretty_table};
use crate::validation::CarForm;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::io::{BufRead, Write};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            add(&store, session, sub)?;
        }
        Some(("edit", sub)) => edit(&store, session, sub)?,
        Some(("list", sub)) => list(&store, session, sub)?,
        Some(("rm", sub)) => {
            let stdin = std::io::stdin();
            rm(&store, session, sub, &mut stdin.lock(), &mut std::io::stdout())?;
        }
        _ => {}
    }
    Ok(())
}

/// Overwrites form fields with whatever was passed on the command line.
fn apply_args(form: &mut CarForm, sub: &clap::ArgMatches) {
    let fields: [(&str, &mut String); 5] = [
        ("name", &mut form.name),
        ("reg", &mut form.registration_number),
        ("brand", &mut form.brand),
        ("model", &mut form.model),
        ("year", &mut form.year),
    ];
    for (arg, slot) in fields {
        if let Some(v) = sub.get_one::<String>(arg) {
            *slot = v.clone();
        }
    }
}

pub fn add(store: &dyn RecordStore, session: &Session, sub: &clap::ArgMatches) -> Result<i64> {
    let mut form = CarForm::default();
    apply_args(&mut form, sub);
    let draft = form.validate()?;
    let id = store.insert_car(session, &draft)?;
    println!("Added car '{}' (id {})", draft.name, id);
    Ok(id)
}

pub fn edit(store: &dyn RecordStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    let existing = store.car(session, id)?;
    let mut form = CarForm::from_car(&existing);
    apply_args(&mut form, sub);
    let draft = form.validate()?;
    store.update_car(session, id, &draft)?;
    println!("Updated car '{}'", draft.name);
    Ok(())
}

fn list(store: &dyn RecordStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let mut view = View::new(CarListLoader);
    view.load(store, session)?;
    let cars = view.data().map(Vec::as_slice).unwrap_or_default();
    if !maybe_print_json(sub.get_flag("json"), &cars)? {
        if cars.is_empty() {
            println!("No cars yet. Add one with `carledger car add --name <name>`.");
            return Ok(());
        }
        let data = cars
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.registration_number.clone().unwrap_or_default(),
                    c.brand.clone().unwrap_or_default(),
                    c.model.clone().unwrap_or_default(),
                    c.year.map(|y| y.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Reg", "Brand", "Model", "Year"], data)
        );
    }
    Ok(())
}

pub fn rm<R: BufRead, W: Write>(
    store: &dyn RecordStore,
    session: &Session,
    sub: &clap::ArgMatches,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    let car = store.car(session, id)?;
    if !sub.get_flag("yes") {
        let n = store.count_car_expenses(session, id)?;
        let question = format!(
            "Delete '{}' and its {} expense(s)? This cannot be undone.",
            car.name, n
        );
        if !confirm(input, out, &question)? {
            writeln!(out, "Cancelled")?;
            return Ok(false);
        }
    }
    store.delete_car(session, id)?;
    writeln!(out, "Removed car '{}'", car.name)?;
    Ok(true)
}
