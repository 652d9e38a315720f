// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::future::Future;
use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Result, anyhow};
use chrono::Utc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use super::Context;
use crate::activity::ActivityEntry;
use crate::dashboard::DashboardSnapshot;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use crate::view::{DashboardView, LoadOutcome, LoadState};

const INTERRUPTED: &str = "Interrupted; dashboard load discarded";

pub async fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let interactive = !sub.get_flag("no-retry") && std::io::stdin().is_terminal();

    let aggregator = ctx.aggregator();
    let mut view = DashboardView::new();
    let cancel = view.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let result = loop {
        if view.load(&aggregator, Utc::now()).await == LoadOutcome::Discarded {
            break Err(anyhow!(INTERRUPTED));
        }
        match view.state() {
            LoadState::Ready(snapshot) => {
                if !maybe_print_json(json_flag, jsonl_flag, snapshot.as_ref())? {
                    print_snapshot(snapshot, &ctx.cfg.currency);
                }
                break Ok(());
            }
            LoadState::Failed(msg) => {
                eprintln!("{}", msg);
                let msg = msg.clone();
                if !interactive {
                    break Err(anyhow!(msg));
                }
                match prompt_retry(&view.cancel_handle()).await? {
                    None => break Err(anyhow!(INTERRUPTED)),
                    Some(true) if view.retry() => continue,
                    Some(_) => break Err(anyhow!(msg)),
                }
            }
            LoadState::Loading => break Err(anyhow!("Dashboard load did not settle")),
        }
    };

    view.teardown();
    interrupt.abort();
    result
}

async fn prompt_retry(cancel: &CancellationToken) -> Result<Option<bool>> {
    eprint!("Retry? [y/N] ");
    std::io::stderr().flush()?;
    await_retry_answer(read_stdin_line(), cancel).await
}

// A plain thread, so a read left pending after an interrupt never holds up
// runtime shutdown.
fn read_stdin_line() -> impl Future<Output = std::io::Result<String>> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let res = std::io::stdin().lock().read_line(&mut line).map(|_| line);
        let _ = tx.send(res);
    });
    async move {
        rx.await
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin reader went away")))
    }
}

/// Waits for the answer to the retry prompt. `None` when the view is torn
/// down first; otherwise whether the answer was yes.
pub async fn await_retry_answer<F>(answer: F, cancel: &CancellationToken) -> Result<Option<bool>>
where
    F: Future<Output = std::io::Result<String>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Ok(None),
        line = answer => Ok(Some(is_yes(&line?))),
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn summary_rows(s: &DashboardSnapshot, ccy: &str) -> Vec<Vec<String>> {
    let row = |k: &str, v: String| vec![k.to_string(), v];
    vec![
        row("Total units", s.units.total_units.to_string()),
        row("Occupied units", s.units.occupied_units.to_string()),
        row("Vacant units", s.units.vacant_units.to_string()),
        row("Under maintenance", s.units.maintenance_units.to_string()),
        row("Occupancy rate", fmt_percent(s.occupancy_rate)),
        row("Active tenants", s.tenants.active_tenants.to_string()),
        row("Inactive tenants", s.tenants.inactive_tenants.to_string()),
        row("Moved out", s.tenants.moved_out_tenants.to_string()),
        row("Collected (total)", fmt_money(&s.payments.total_amount, ccy)),
        row("Collected this month", fmt_money(&s.payments.this_month_amount, ccy)),
        row("Pending", fmt_money(&s.payments.pending_amount, ccy)),
        row("Overdue", fmt_money(&s.payments.overdue_amount, ccy)),
        row("Collection progress", fmt_percent(s.collection_progress)),
        row("Pending repairs", s.damage.pending_reports.to_string()),
        row("Repaired", s.damage.repaired_reports.to_string()),
        row("Unrepaired", s.damage.unrepaired_reports.to_string()),
    ]
}

pub fn activity_rows(entries: &[ActivityEntry], ccy: &str) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            vec![
                e.time_label.clone(),
                e.kind().to_string(),
                e.description.clone(),
                e.amount()
                    .map(|a| fmt_money(&a, ccy))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

pub fn print_activity(entries: &[ActivityEntry], ccy: &str) {
    if entries.is_empty() {
        println!("No recent activity.");
        return;
    }
    println!(
        "{}",
        pretty_table(
            &["When", "Type", "Activity", "Amount"],
            activity_rows(entries, ccy)
        )
    );
}

fn print_snapshot(s: &DashboardSnapshot, ccy: &str) {
    println!("{}", pretty_table(&["Metric", "Value"], summary_rows(s, ccy)));
    print_activity(&s.activity, ccy);
}
