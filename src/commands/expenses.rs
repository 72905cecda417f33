// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{UNKNOWN_CAR, UNKNOWN_CATEGORY};
use crate::loader::{ExpenseListLoader, View};
use crate::session::Session;
use crate::store::{RecordStore, SqliteStore};
use crate::utils::{confirm, fmt_money, maybe_print_json, pretty_table};
use crate::validation::ExpenseForm;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use std::io::{BufRead, Write};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let today = chrono::Local::now().date_naive();
            add(&store, session, sub, today)?;
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

fn car_id_for_name(store: &dyn RecordStore, session: &Session, name: &str) -> Result<i64> {
    let car = store
        .car_by_name(session, name)?
        .with_context(|| format!("Car '{}' not found", name))?;
    Ok(car.id)
}

fn category_id_for_name(store: &dyn RecordStore, name: &str) -> Result<i64> {
    let cat = store
        .category_by_name_or_slug(name)?
        .with_context(|| format!("Category '{}' not found", name))?;
    Ok(cat.id)
}

/// Overwrites form fields with whatever was passed on the command line.
fn apply_args(
    store: &dyn RecordStore,
    session: &Session,
    form: &mut ExpenseForm,
    sub: &clap::ArgMatches,
) -> Result<()> {
    if let Some(car) = sub.get_one::<String>("car") {
        form.car_id = Some(car_id_for_name(store, session, car)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        form.category_id = Some(category_id_for_name(store, cat)?);
    }
    let fields: [(&str, &mut String); 4] = [
        ("amount", &mut form.amount),
        ("date", &mut form.date),
        ("note", &mut form.note),
        ("odometer", &mut form.odometer_km),
    ];
    for (arg, slot) in fields {
        if let Some(v) = sub.get_one::<String>(arg) {
            *slot = v.clone();
        }
    }
    Ok(())
}

pub fn add(
    store: &dyn RecordStore,
    session: &Session,
    sub: &clap::ArgMatches,
    today: chrono::NaiveDate,
) -> Result<i64> {
    let mut form = ExpenseForm::new(today);
    if sub.get_one::<String>("car").is_none() {
        // a single car is picked automatically
        let cars = store.list_cars(session)?;
        if let [only] = cars.as_slice() {
            form.car_id = Some(only.id);
        }
    }
    apply_args(store, session, &mut form, sub)?;
    let draft = form.validate()?;
    let id = store.insert_expense(session, &draft)?;
    println!("Recorded {} on {} (id {})", draft.amount, draft.date, id);
    Ok(id)
}

pub fn edit(store: &dyn RecordStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    let existing = store.expense(session, id)?;
    let mut form = ExpenseForm::from_expense(&existing.expense);
    apply_args(store, session, &mut form, sub)?;
    let draft = form.validate()?;
    store.update_expense(session, id, &draft)?;
    println!("Updated expense {}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub car: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub odometer_km: Option<i64>,
    pub note: String,
}

pub fn query_rows(
    store: &dyn RecordStore,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRow>> {
    let car_id = match sub.get_one::<String>("car") {
        Some(name) => Some(car_id_for_name(store, session, name)?),
        None => None,
    };
    let mut view = View::new(ExpenseListLoader { car_id });
    view.load(store, session)?;
    let expenses = view
        .data()
        .ok_or_else(|| anyhow!("Expenses could not be loaded"))?;
    Ok(expenses
        .iter()
        .map(|e| ExpenseRow {
            id: e.expense.id,
            date: e.expense.date.to_string(),
            car: e.labels.car.clone().unwrap_or_else(|| UNKNOWN_CAR.into()),
            category: e
                .labels
                .category
                .clone()
                .unwrap_or_else(|| UNKNOWN_CATEGORY.into()),
            amount: format!("{:.2}", e.expense.amount),
            currency: e.expense.currency.clone(),
            odometer_km: e.expense.odometer_km,
            note: e.expense.note.clone().unwrap_or_default(),
        })
        .collect())
}

fn list(store: &dyn RecordStore, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        if data.is_empty() {
            println!("No expenses. Add your first with `carledger expense add`.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date,
                    r.car,
                    r.category,
                    format!("{} {}", r.amount, r.currency),
                    r.odometer_km.map(|k| k.to_string()).unwrap_or_default(),
                    r.note,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Car", "Category", "Amount", "Odometer", "Note"],
                rows,
            )
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
    let existing = store.expense(session, id)?;
    let shown = fmt_money(&existing.expense.amount, &existing.expense.currency);
    if !sub.get_flag("yes") {
        let question = format!("Delete this expense ({})?", shown);
        if !confirm(input, out, &question)? {
            writeln!(out, "Cancelled")?;
            return Ok(false);
        }
    }
    store.delete_expense(session, id)?;
    writeln!(out, "Removed expense {} ({})", id, shown)?;
    Ok(true)
}
