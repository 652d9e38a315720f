// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result, bail};
use serde::Serialize;

use super::Context;
use crate::models::{PaymentStatus, normalize_label};
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
                    r.date.clone(),
                    r.id.clone(),
                    or_dash(&r.tenant),
                    or_dash(&r.unit),
                    r.amount.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "ID", "Tenant", "Unit", "Amount", "Status"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PaymentRow {
    pub id: String,
    pub date: String,
    pub tenant: String,
    pub unit: String,
    pub amount: String,
    pub status: String,
}

/// Payments newest first, filtered by `--status` and `--search`.
pub async fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<PaymentRow>> {
    let status = match sub.get_one::<String>("status") {
        Some(raw) => match PaymentStatus::from_label(raw) {
            PaymentStatus::Other => bail!("Unknown payment status '{}'", normalize_label(raw)),
            s => Some(s),
        },
        None => None,
    };
    let re = search_pattern(sub.get_one::<String>("search"))?;

    let mut payments = ctx.api.payments().await.context("Failed to load payments")?;
    payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));

    let ccy = &ctx.cfg.currency;
    Ok(payments
        .into_iter()
        .filter(|p| status.is_none_or(|s| p.status == s))
        .filter(|p| {
            matches_any(
                re.as_ref(),
                &[
                    &p.id,
                    p.tenant_name.as_deref().unwrap_or_default(),
                    p.unit_id.as_deref().unwrap_or_default(),
                ],
            )
        })
        .map(|p| PaymentRow {
            id: p.id,
            date: p.payment_date.to_string(),
            tenant: p.tenant_name.unwrap_or_default(),
            unit: p.unit_id.unwrap_or_default(),
            amount: fmt_money(&p.amount, ccy),
            status: p.status.as_str().to_string(),
        })
        .collect())
}
