// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use serde_json::json;

use super::Context;
use crate::activity::ActivityEntry;

pub async fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("activity", sub)) => export_activity(ctx, sub).await,
        _ => Ok(()),
    }
}

async fn export_activity(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim().to_string();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let entries = ctx
        .aggregator()
        .recent_activity(Utc::now())
        .await
        .map_err(|e| anyhow!(e.summary()))?;
    write_activity(&entries, &fmt, &out)?;
    println!("Exported {} activity entries to {}", entries.len(), out);
    Ok(())
}

pub fn write_activity(entries: &[ActivityEntry], fmt: &str, out: &str) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "type",
                "occurred_on",
                "time_label",
                "description",
                "amount",
                "unit",
                "source_id",
            ])?;
            for e in entries {
                wtr.write_record([
                    e.kind().to_string(),
                    e.occurred_on.to_string(),
                    e.time_label.clone(),
                    e.description.clone(),
                    e.amount().map(|a| a.to_string()).unwrap_or_default(),
                    e.unit_id().unwrap_or_default().to_string(),
                    e.source_id().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = entries
                .iter()
                .map(|e| {
                    json!({
                        "type": e.kind(), "occurred_on": e.occurred_on, "time_label": e.time_label,
                        "description": e.description, "amount": e.amount().map(|a| a.to_string()),
                        "unit": e.unit_id(), "source_id": e.source_id()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
