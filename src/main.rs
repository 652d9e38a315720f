// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rentdash::api::{HttpPropertyApi, Session};
use rentdash::commands::{self, Context};
use rentdash::{cli, config};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "rentdash=warn".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let overrides = cli::overrides(&matches);

    // `config` must keep working when the stored or environment values are bad.
    if let Some(("config", sub)) = matches.subcommand() {
        return commands::config::handle(&config::config_path()?, &overrides, sub);
    }

    let cfg = config::resolve(&overrides)?;

    let session = match cfg.token.as_deref() {
        Some(token) => Session::bearer(token),
        None => Session::anonymous(),
    };
    let api = HttpPropertyApi::new(&cfg, session)?;
    tracing::debug!(base = api.base_url(), "client ready");
    let ctx = Context::new(cfg, Arc::new(api));

    match matches.subcommand() {
        Some(("dashboard", sub)) => commands::dashboard::handle(&ctx, sub).await?,
        Some(("activity", sub)) => commands::activity::handle(&ctx, sub).await?,
        Some(("units", sub)) => commands::units::handle(&ctx, sub).await?,
        Some(("tenants", sub)) => commands::tenants::handle(&ctx, sub).await?,
        Some(("payments", sub)) => commands::payments::handle(&ctx, sub).await?,
        Some(("damage", sub)) => commands::damage::handle(&ctx, sub).await?,
        Some(("health", _)) => commands::health::handle(&ctx).await?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
