// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::Context;
use crate::utils::{matches_any, maybe_print_json, or_dash, pretty_table, search_pattern};

pub async fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctx, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ctx, sub).await?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.id.clone(),
                    or_dash(&r.unit),
                    r.damage_type.clone(),
                    if r.repaired { "yes".into() } else { "no".into() },
                    or_dash(&r.description),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Reported", "ID", "Unit", "Type", "Repaired", "Description"],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct DamageRow {
    pub id: String,
    pub date: String,
    pub unit: String,
    pub damage_type: String,
    pub repaired: bool,
    pub description: String,
}

/// Reports newest first, filtered by `--search`.
pub async fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<DamageRow>> {
    let re = search_pattern(sub.get_one::<String>("search"))?;
    let mut reports = ctx
        .api
        .damage_reports()
        .await
        .context("Failed to load damage reports")?;
    reports.sort_by(|a, b| b.report_date.cmp(&a.report_date));

    Ok(reports
        .into_iter()
        .filter(|r| {
            matches_any(
                re.as_ref(),
                &[
                    &r.id,
                    &r.damage_type,
                    r.unit_id.as_deref().unwrap_or_default(),
                    r.description.as_deref().unwrap_or_default(),
                ],
            )
        })
        .map(|r| DamageRow {
            id: r.id,
            date: r.report_date.to_string(),
            unit: r.unit_id.unwrap_or_default(),
            damage_type: r.damage_type,
            repaired: r.repair_completed,
            description: r.description.unwrap_or_default(),
        })
        .collect())
}
