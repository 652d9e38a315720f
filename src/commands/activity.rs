// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;

use super::Context;
use super::dashboard::print_activity;
use crate::utils::maybe_print_json;

pub async fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let entries = ctx
        .aggregator()
        .recent_activity(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!(e.summary()))?;
    if !maybe_print_json(json_flag, jsonl_flag, &entries)? {
        print_activity(&entries, &ctx.cfg.currency);
    }
    Ok(())
}
