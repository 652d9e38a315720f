// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::Context;
use crate::utils::{fmt_money, matches_any, maybe_print_json, or_dash, pretty_table, search_pattern};

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
                    r.unit.clone(),
                    or_dash(&r.name),
                    r.status.clone(),
                    or_dash(&r.rent),
                    or_dash(&r.tenant),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Unit", "Name", "Status", "Rent", "Tenant"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct UnitRow {
    pub unit: String,
    pub name: String,
    pub status: String,
    pub rent: String,
    pub tenant: String,
}

pub async fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<UnitRow>> {
    let re = search_pattern(sub.get_one::<String>("search"))?;
    let units = ctx.api.units().await.context("Failed to load units")?;
    let ccy = &ctx.cfg.currency;

    let mut rows: Vec<UnitRow> = units
        .into_iter()
        .filter(|u| {
            matches_any(
                re.as_ref(),
                &[
                    u.unit_id.as_deref().unwrap_or(&u.id),
                    u.name.as_deref().unwrap_or_default(),
                    &u.status,
                    u.tenant_name.as_deref().unwrap_or_default(),
                ],
            )
        })
        .map(|u| UnitRow {
            unit: u.unit_id.unwrap_or(u.id),
            name: u.name.unwrap_or_default(),
            status: u.status,
            rent: u.rent.map(|r| fmt_money(&r, ccy)).unwrap_or_default(),
            tenant: u.tenant_name.unwrap_or_default(),
        })
        .collect();
    rows.sort_by(|a, b| a.unit.cmp(&b.unit));
    Ok(rows)
}
