// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_percent(v: f64) -> String {
    format!("{:.1}%", v)
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

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Case-insensitive search pattern for list filters.
pub fn search_pattern(raw: Option<&String>) -> Result<Option<Regex>> {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(p) => {
            let re = RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid search pattern '{}'", p))?;
            Ok(Some(re))
        }
        None => Ok(None),
    }
}

/// True when there is no pattern or any field matches it.
pub fn matches_any(re: Option<&Regex>, fields: &[&str]) -> bool {
    match re {
        None => true,
        Some(re) => fields.iter().any(|f| re.is_match(f)),
    }
}

pub fn or_dash(v: &str) -> String {
    if v.is_empty() {
        "-".to_string()
    } else {
        v.to_string()
    }
}
