// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::config::Overrides;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn search_arg() -> Arg {
    Arg::new("search")
        .long("search")
        .value_name("REGEX")
        .help("Case-insensitive pattern matched against the row's text fields")
}

fn status_arg() -> Arg {
    Arg::new("status")
        .long("status")
        .value_name("STATUS")
        .help("Only rows with this status (e.g. active, completed, moved-out)")
}

pub fn build_cli() -> Command {
    Command::new("rentdash")
        .version(clap::crate_version!())
        .about("Property-management dashboard: units, tenants, payments and damage reports")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("Base URL of the property API (overrides config and RENTDASH_API_URL)"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .global(true)
                .value_name("TOKEN")
                .help("Bearer token for the current session"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .value_name("SECS")
                .value_parser(value_parser!(u64))
                .help("Per-request timeout in seconds"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit diagnostics on stderr as JSON lines"),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Load the dashboard snapshot: stats, ratios and recent activity")
                .arg(
                    Arg::new("no-retry")
                        .long("no-retry")
                        .action(ArgAction::SetTrue)
                        .help("Do not offer to retry after a failed load"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("activity").about("Show the recent activity feed only"),
        ))
        .subcommand(
            Command::new("units")
                .about("Rental units")
                .subcommand(json_flags(
                    Command::new("list").about("List units").arg(search_arg()),
                )),
        )
        .subcommand(
            Command::new("tenants").about("Tenants").subcommand(json_flags(
                Command::new("list")
                    .about("List tenants")
                    .arg(status_arg())
                    .arg(search_arg()),
            )),
        )
        .subcommand(
            Command::new("payments").about("Payments").subcommand(json_flags(
                Command::new("list")
                    .about("List payments")
                    .arg(status_arg())
                    .arg(search_arg()),
            )),
        )
        .subcommand(
            Command::new("damage")
                .about("Damage reports")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List damage reports")
                        .arg(search_arg()),
                )),
        )
        .subcommand(Command::new("health").about("Check that the API is reachable"))
        .subcommand(
            Command::new("export").about("Export data to a file").subcommand(
                Command::new("activity")
                    .about("Export the recent activity feed")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(
                        Arg::new("out")
                            .long("out")
                            .required(true)
                            .value_name("PATH"),
                    ),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change stored settings")
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Store a setting (api_url, token, timeout_secs, currency)")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}

/// Global flags that override stored configuration.
pub fn overrides(m: &ArgMatches) -> Overrides {
    Overrides {
        api_url: m.get_one::<String>("api-url").cloned(),
        token: m.get_one::<String>("token").cloned(),
        timeout_secs: m.get_one::<u64>("timeout").copied(),
    }
}
