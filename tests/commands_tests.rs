// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod support;

use std::sync::Arc;

use rentdash::api::endpoints;
use rentdash::commands::{
    self, Context, damage, dashboard as dash_cmd, exporter, payments, tenants, units,
};
use rentdash::config::{self, Config, Overrides};
use rentdash::models::{PaymentStatus, Unit};
use rentdash::{activity, cli};
use support::{FakeApi, at, date, payment, sample_api};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn ctx(api: FakeApi) -> Context {
    Context::new(Config::default(), Arc::new(api))
}

fn sub_of<'a>(m: &'a clap::ArgMatches, path: &[&str]) -> &'a clap::ArgMatches {
    path.iter().fold(m, |m, name| m.subcommand_matches(name).unwrap())
}

#[tokio::test]
async fn payments_list_filters_by_status_and_search() {
    let mut api = sample_api();
    api.payments
        .push(payment("p9", PaymentStatus::Overdue, date(2025, 8, 2), "500"));
    let ctx = ctx(api);

    let m = cli::build_cli().get_matches_from(["rentdash", "payments", "list", "--status", "Completed"]);
    let rows = payments::query_rows(&ctx, sub_of(&m, &["payments", "list"])).await.unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p3", "p1", "p4"]);
    assert_eq!(rows[0].amount, "KES 30000.00");
    assert_eq!(rows[0].status, "completed");

    let m = cli::build_cli().get_matches_from(["rentdash", "payments", "list", "--search", "tenant P9"]);
    let rows = payments::query_rows(&ctx, sub_of(&m, &["payments", "list"])).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "overdue");
}

#[tokio::test]
async fn unknown_status_is_rejected_before_fetching() {
    let api = sample_api();
    let ctx = ctx(api.clone());
    let m = cli::build_cli().get_matches_from(["rentdash", "tenants", "list", "--status", "evicted"]);
    let err = tenants::query_rows(&ctx, sub_of(&m, &["tenants", "list"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unknown tenant status 'evicted'"));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn tenants_list_is_sorted_by_name() {
    let ctx = ctx(sample_api());
    let m = cli::build_cli().get_matches_from(["rentdash", "tenants", "list", "--status", "active"]);
    let rows = tenants::query_rows(&ctx, sub_of(&m, &["tenants", "list"])).await.unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Mike Wilson", "Sarah Johnson"]);
}

#[tokio::test]
async fn invalid_search_pattern_is_an_error() {
    let ctx = ctx(sample_api());
    let m = cli::build_cli().get_matches_from(["rentdash", "damage", "list", "--search", "(unclosed"]);
    assert!(damage::query_rows(&ctx, sub_of(&m, &["damage", "list"])).await.is_err());
}

#[tokio::test]
async fn damage_list_is_newest_first() {
    let ctx = ctx(sample_api());
    let m = cli::build_cli().get_matches_from(["rentdash", "damage", "list"]);
    let rows = damage::query_rows(&ctx, sub_of(&m, &["damage", "list"])).await.unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2"]);
}

#[tokio::test]
async fn units_list_prefers_the_display_code() {
    let mut api = sample_api();
    api.units = vec![
        Unit {
            id: "2".to_string(),
            unit_id: Some("B-201".to_string()),
            name: Some("Garden flat".to_string()),
            status: "vacant".to_string(),
            rent: Some(support::dec("18000")),
            tenant_name: None,
        },
        Unit {
            id: "1".to_string(),
            unit_id: None,
            name: None,
            status: "occupied".to_string(),
            rent: None,
            tenant_name: Some("Ann".to_string()),
        },
    ];
    let ctx = ctx(api);
    let m = cli::build_cli().get_matches_from(["rentdash", "units", "list"]);
    let rows = units::query_rows(&ctx, sub_of(&m, &["units", "list"])).await.unwrap();
    assert_eq!(rows[0].unit, "1");
    assert_eq!(rows[1].unit, "B-201");
    assert_eq!(rows[1].rent, "KES 18000.00");

    let m = cli::build_cli().get_matches_from(["rentdash", "units", "list", "--search", "garden"]);
    let rows = units::query_rows(&ctx, sub_of(&m, &["units", "list"])).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn json_and_jsonl_flags_conflict() {
    let res = cli::build_cli().try_get_matches_from(["rentdash", "activity", "--json", "--jsonl"]);
    assert!(res.is_err());
}

#[test]
fn activity_rows_show_money_only_for_payments() {
    let api = sample_api();
    let feed = activity::synthesize(&api.payments, &api.tenants, &api.reports, at(2025, 8, 15, 12, 0));
    let rows = dash_cmd::activity_rows(&feed, "KES");
    assert_eq!(rows[0], vec!["3 days ago", "payment", "Payment received from Tenant p3 (U-p3)", "KES 30000.00"]);
    assert_eq!(rows[1][3], "-");
}

#[tokio::test]
async fn export_activity_writes_csv_and_json() {
    let api = sample_api();
    let feed = activity::synthesize(&api.payments, &api.tenants, &api.reports, at(2025, 8, 15, 12, 0));
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("activity.csv");
    exporter::write_activity(&feed, "csv", csv_path.to_str().unwrap()).unwrap();
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("type"));
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].get(0), Some("payment"));
    assert_eq!(records[0].get(1), Some("2025-08-12"));
    assert_eq!(records[0].get(4), Some("30000"));
    assert_eq!(records[1].get(4), Some(""));

    let json_path = dir.path().join("activity.json");
    exporter::write_activity(&feed, "json", json_path.to_str().unwrap()).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 6);
    assert_eq!(arr[1]["type"], "move_in");
    assert_eq!(arr[1]["amount"], serde_json::Value::Null);
}

#[tokio::test]
async fn export_rejects_unknown_format_without_fetching() {
    let api = sample_api();
    let ctx = ctx(api.clone());
    let dir = tempdir().unwrap();
    let out = dir.path().join("activity.xml");
    let m = cli::build_cli().get_matches_from([
        "rentdash",
        "export",
        "activity",
        "--format",
        "xml",
        "--out",
        out.to_str().unwrap(),
    ]);

    let err = exporter::handle(&ctx, m.subcommand_matches("export").unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn export_fails_when_a_collection_fails() {
    let api = FakeApi {
        fail: Some(endpoints::DAMAGE_REPORTS),
        ..sample_api()
    };
    let ctx = ctx(api);
    let dir = tempdir().unwrap();
    let out = dir.path().join("activity.csv");
    let m = cli::build_cli().get_matches_from([
        "rentdash",
        "export",
        "activity",
        "--out",
        out.to_str().unwrap(),
    ]);

    let err = exporter::handle(&ctx, m.subcommand_matches("export").unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains(endpoints::DAMAGE_REPORTS));
    assert!(!out.exists());
}

#[test]
fn config_set_persists_to_the_given_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let m = cli::build_cli().get_matches_from(["rentdash", "config", "set", "currency", "usd"]);
    commands::config::handle(&path, &Overrides::default(), m.subcommand_matches("config").unwrap())
        .unwrap();
    assert_eq!(config::load_from(&path).unwrap().currency, "USD");

    let m = cli::build_cli().get_matches_from(["rentdash", "config", "set", "colour", "blue"]);
    assert!(
        commands::config::handle(&path, &Overrides::default(), m.subcommand_matches("config").unwrap())
            .is_err()
    );
}

#[test]
fn config_set_repairs_an_unreadable_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(config::load_from(&path).is_err());

    let m = cli::build_cli().get_matches_from(["rentdash", "config", "set", "timeout_secs", "20"]);
    commands::config::handle(&path, &Overrides::default(), m.subcommand_matches("config").unwrap())
        .unwrap();

    let repaired = config::load_from(&path).unwrap();
    assert_eq!(repaired.timeout_secs, 20);
    assert_eq!(repaired.api_url, Config::default().api_url);
}

#[tokio::test]
async fn retry_prompt_gives_way_to_an_interrupt() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        trigger.cancel();
    });

    // nobody ever answers
    let answer = std::future::pending::<std::io::Result<String>>();
    let outcome = dash_cmd::await_retry_answer(answer, &cancel).await.unwrap();
    assert_eq!(outcome, None);
}

#[tokio::test]
async fn retry_prompt_reads_yes_and_no() {
    let cancel = CancellationToken::new();
    let yes = dash_cmd::await_retry_answer(async { Ok::<_, std::io::Error>(" Yes\n".to_string()) }, &cancel).await;
    assert_eq!(yes.unwrap(), Some(true));
    let no = dash_cmd::await_retry_answer(async { Ok::<_, std::io::Error>("\n".to_string()) }, &cancel).await;
    assert_eq!(no.unwrap(), Some(false));
}
