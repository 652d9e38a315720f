// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::config::{self, Config, Overrides};
use crate::utils::pretty_table;

/// `config` does not talk to the API, so it takes the file path directly.
pub fn handle(path: &Path, cli: &Overrides, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let effective = config::load_from(path)?.layered(|k| std::env::var(k).ok(), cli)?;
            show(path, &effective)
        }
        Some(("set", sub)) => set(path, sub),
        _ => Ok(()),
    }
}

fn show(path: &Path, cfg: &Config) -> Result<()> {
    let rows = vec![
        vec!["api_url".to_string(), cfg.api_url.clone()],
        vec!["token".to_string(), cfg.redacted_token()],
        vec!["timeout_secs".to_string(), cfg.timeout_secs.to_string()],
        vec!["currency".to_string(), cfg.currency.clone()],
        vec!["file".to_string(), path.display().to_string()],
    ];
    println!("{}", pretty_table(&["Key", "Value"], rows));
    Ok(())
}

/// Only the file is read; an unreadable file is replaced, starting from the
/// defaults.
fn set(path: &Path, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap().trim().to_string();
    let value = sub.get_one::<String>("value").unwrap();
    let mut stored = match config::load_from(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "stored config unreadable; starting from defaults");
            eprintln!("Warning: {:#}; starting from defaults", e);
            Config::default()
        }
    };
    stored.set(&key, value)?;
    config::save_to(path, &stored)?;
    if key == "token" {
        println!("Set token = {}", stored.redacted_token());
    } else {
        println!("Set {} = {}", key, value.trim());
    }
    Ok(())
}
