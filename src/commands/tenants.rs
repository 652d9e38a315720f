// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result, bail};
use serde::Serialize;

use super::Context;
use crate::models::{TenantStatus, normalize_label};
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
                    r.id.clone(),
                    r.name.clone(),
                    r.status.clone(),
                    or_dash(&r.unit),
                    or_dash(&r.move_in),
                    or_dash(&r.phone),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Status", "Unit", "Moved in", "Phone"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TenantRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub unit: String,
    pub move_in: String,
    pub email: String,
    pub phone: String,
}

/// Tenants by name, filtered by `--status` and `--search`.
pub async fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<TenantRow>> {
    let status = match sub.get_one::<String>("status") {
        Some(raw) => match TenantStatus::from_label(raw) {
            TenantStatus::Other => bail!("Unknown tenant status '{}'", normalize_label(raw)),
            s => Some(s),
        },
        None => None,
    };
    let re = search_pattern(sub.get_one::<String>("search"))?;

    let mut tenants = ctx.api.tenants().await.context("Failed to load tenants")?;
    tenants.sort_by(|a, b| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()));

    Ok(tenants
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| {
            matches_any(
                re.as_ref(),
                &[
                    &t.id,
                    &t.full_name,
                    t.email.as_deref().unwrap_or_default(),
                    t.phone.as_deref().unwrap_or_default(),
                    t.unit_id.as_deref().unwrap_or_default(),
                ],
            )
        })
        .map(|t| TenantRow {
            id: t.id,
            name: t.full_name,
            status: t.status.as_str().to_string(),
            unit: t.unit_id.unwrap_or_default(),
            move_in: t.move_in_date.map(|d| d.to_string()).unwrap_or_default(),
            email: t.email.unwrap_or_default(),
            phone: t.phone.unwrap_or_default(),
        })
        .collect())
}
