// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};
use std::time::Instant;

use super::Context;

pub async fn handle(ctx: &Context) -> Result<()> {
    let started = Instant::now();
    ctx.api
        .health()
        .await
        .with_context(|| format!("API at {} is not reachable", ctx.cfg.base_url()))?;
    println!(
        "✅ API at {} is healthy ({} ms)",
        ctx.cfg.base_url(),
        started.elapsed().as_millis()
    );
    Ok(())
}
