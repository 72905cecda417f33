// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn yes_flag() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation prompt")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn car_fields(cmd: Command, name_required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(name_required))
        .arg(Arg::new("reg").long("reg").help("Registration number"))
        .arg(Arg::new("brand").long("brand"))
        .arg(Arg::new("model").long("model"))
        .arg(Arg::new("year").long("year").help("Model year"))
}

fn expense_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("car")
            .long("car")
            .help("Car name (optional when you only have one car)"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .help("Category name or slug"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .allow_hyphen_values(true),
    )
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
    .arg(Arg::new("note").long("note"))
    .arg(Arg::new("odometer").long("odometer").help("Odometer reading in km"))
}

pub fn build_cli() -> Command {
    Command::new("carledger")
        .version(crate_version!())
        .about("Track what your cars cost you")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("CARLEDGER_DB")
                .help("Path to the SQLite database"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .env("CARLEDGER_USER")
                .help("E-mail of the profile to act as"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("profile")
                .about("Manage profiles")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("name").long("name").help("Display name")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("category")
                .about("Expense categories")
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(
            Command::new("car")
                .about("Manage cars")
                .subcommand(car_fields(Command::new("add"), true))
                .subcommand(car_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("rm").arg(id_arg()).arg(yes_flag())),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and review expenses")
                .subcommand(expense_fields(Command::new("add"), true))
                .subcommand(expense_fields(Command::new("edit").arg(id_arg()), false))
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("car").long("car").help("Only this car"))
                        .arg(json_flag()),
                )
                .subcommand(Command::new("rm").arg(id_arg()).arg(yes_flag())),
        )
        .subcommand(
            Command::new("overview")
                .about("Total spending, per category and per car")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("config").about("Settings").subcommand(
                Command::new("currency")
                    .about("Show or set the currency code")
                    .arg(Arg::new("set").long("set")),
            ),
        )
}
