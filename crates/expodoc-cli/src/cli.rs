//! Command line definition

use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, Command};
use expodoc_core::DocumentaryStatus;
use expodoc_table::TableFormat;
use std::path::PathBuf;

/// Build the `expodoc` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("expodoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Documentary status and billing follow-up for export shipments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Comment store file (overrides the configuration)"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .value_parser(value_parser!(NaiveDate))
                .help("Evaluation date as YYYY-MM-DD (defaults to the local date)"),
        )
        .arg(
            Arg::new("sheet")
                .long("sheet")
                .global(true)
                .help("Worksheet to read from workbooks (defaults to the first)"),
        )
        .subcommand(
            filter_args(
                Command::new("enrich")
                    .about("Classify every shipment and merge stored comments")
                    .arg(input_arg())
                    .arg(
                        Arg::new("output")
                            .long("output")
                            .short('o')
                            .value_parser(value_parser!(PathBuf))
                            .help("Write the enriched table here instead of stdout"),
                    )
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(value_parser!(TableFormat))
                            .help(
                                "Output format: csv or json \
                                 (defaults to the output extension, then csv)",
                            ),
                    ),
            ),
        )
        .subcommand(
            filter_args(
                Command::new("summary")
                    .about("Headline counts and status distributions")
                    .arg(input_arg())
                    .arg(
                        Arg::new("json")
                            .long("json")
                            .action(ArgAction::SetTrue)
                            .help("Output as JSON"),
                    ),
            ),
        )
        .subcommand(
            Command::new("annotate")
                .about("Set the comment of one shipment and save the store")
                .arg(input_arg())
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .help("Shipment identifier (Doc Entry SAP)"),
                )
                .arg(
                    Arg::new("comment")
                        .long("comment")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("New comment; an empty string clears it"),
                ),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Save the comments of an edited table into the store")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Edited table with identifier and comment columns"),
                ),
        )
        .subcommand(
            Command::new("show-store")
                .about("List stored comments")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Uploaded table (xlsx, xls, ods, csv or json)")
}

fn filter_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("period")
                .long("period")
                .action(ArgAction::Append)
                .help("Keep only this period (repeatable)"),
        )
        .arg(
            Arg::new("company")
                .long("company")
                .action(ArgAction::Append)
                .help("Keep only this company (repeatable)"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .action(ArgAction::Append)
                .value_parser(value_parser!(DocumentaryStatus))
                .help("Keep only this status, by code or label (repeatable)"),
        )
        .arg(
            Arg::new("etd")
                .long("etd")
                .action(ArgAction::Append)
                .value_parser(value_parser!(NaiveDate))
                .help("Keep only this ETD date (repeatable)"),
        )
        .arg(
            Arg::new("eta")
                .long("eta")
                .action(ArgAction::Append)
                .value_parser(value_parser!(NaiveDate))
                .help("Keep only this ETA date (repeatable)"),
        )
}
