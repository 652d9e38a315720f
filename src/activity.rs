// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recent-activity feed: picks the latest few events from each raw
//! collection, merges them newest first and labels each with a relative time.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{DamageReport, Payment, PaymentStatus, Tenant, TenantStatus};

pub const MAX_ENTRIES: usize = 6;
pub const PAYMENT_LIMIT: usize = 3;
pub const MOVE_IN_LIMIT: usize = 2;
pub const MAINTENANCE_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    Payment {
        payment_id: String,
        tenant_name: Option<String>,
        unit_id: Option<String>,
        amount: Decimal,
    },
    MoveIn {
        tenant_id: String,
        tenant_name: String,
        unit_id: Option<String>,
    },
    Maintenance {
        report_id: String,
        unit_id: Option<String>,
        damage_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub event: ActivityEvent,
    pub description: String,
    pub occurred_on: NaiveDate,
    pub time_label: String,
}

impl ActivityEntry {
    fn new(event: ActivityEvent, occurred_on: NaiveDate, now: DateTime<Utc>) -> Self {
        ActivityEntry {
            description: describe(&event),
            time_label: relative_time(start_of_day(occurred_on), now),
            occurred_on,
            event,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.event {
            ActivityEvent::Payment { .. } => "payment",
            ActivityEvent::MoveIn { .. } => "move_in",
            ActivityEvent::Maintenance { .. } => "maintenance",
        }
    }

    pub fn amount(&self) -> Option<Decimal> {
        match self.event {
            ActivityEvent::Payment { amount, .. } => Some(amount),
            _ => None,
        }
    }

    pub fn source_id(&self) -> &str {
        match &self.event {
            ActivityEvent::Payment { payment_id, .. } => payment_id,
            ActivityEvent::MoveIn { tenant_id, .. } => tenant_id,
            ActivityEvent::Maintenance { report_id, .. } => report_id,
        }
    }

    pub fn unit_id(&self) -> Option<&str> {
        match &self.event {
            ActivityEvent::Payment { unit_id, .. }
            | ActivityEvent::MoveIn { unit_id, .. }
            | ActivityEvent::Maintenance { unit_id, .. } => unit_id.as_deref(),
        }
    }
}

/// Completed payments, newest first.
pub fn recent_payments(payments: &[Payment]) -> Vec<&Payment> {
    let mut v: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .collect();
    v.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
    v.truncate(PAYMENT_LIMIT);
    v
}

/// Active tenants with a known move-in date, newest first.
pub fn recent_move_ins(tenants: &[Tenant]) -> Vec<(&Tenant, NaiveDate)> {
    let mut v: Vec<(&Tenant, NaiveDate)> = tenants
        .iter()
        .filter(|t| t.status == TenantStatus::Active)
        .filter_map(|t| t.move_in_date.map(|d| (t, d)))
        .collect();
    v.sort_by(|a, b| b.1.cmp(&a.1));
    v.truncate(MOVE_IN_LIMIT);
    v
}

/// Damage reports of any status, newest first.
pub fn recent_reports(reports: &[DamageReport]) -> Vec<&DamageReport> {
    let mut v: Vec<&DamageReport> = reports.iter().collect();
    v.sort_by(|a, b| b.report_date.cmp(&a.report_date));
    v.truncate(MAINTENANCE_LIMIT);
    v
}

/// Build the feed. Sources are concatenated (payments, move-ins,
/// maintenance), stably sorted by event date descending, then capped at
/// `MAX_ENTRIES`; same-day events keep that source order.
pub fn synthesize(
    payments: &[Payment],
    tenants: &[Tenant],
    reports: &[DamageReport],
    now: DateTime<Utc>,
) -> Vec<ActivityEntry> {
    let mut out = Vec::with_capacity(PAYMENT_LIMIT + MOVE_IN_LIMIT + MAINTENANCE_LIMIT);

    for p in recent_payments(payments) {
        let ev = ActivityEvent::Payment {
            payment_id: p.id.clone(),
            tenant_name: p.tenant_name.clone(),
            unit_id: p.unit_id.clone(),
            amount: p.amount,
        };
        out.push(ActivityEntry::new(ev, p.payment_date, now));
    }
    for (t, moved_in) in recent_move_ins(tenants) {
        let ev = ActivityEvent::MoveIn {
            tenant_id: t.id.clone(),
            tenant_name: t.full_name.clone(),
            unit_id: t.unit_id.clone(),
        };
        out.push(ActivityEntry::new(ev, moved_in, now));
    }
    for r in recent_reports(reports) {
        let ev = ActivityEvent::Maintenance {
            report_id: r.id.clone(),
            unit_id: r.unit_id.clone(),
            damage_type: r.damage_type.clone(),
        };
        out.push(ActivityEntry::new(ev, r.report_date, now));
    }

    out.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on));
    out.truncate(MAX_ENTRIES);
    out
}

/// Calendar dates carry no time of day; treat them as midnight UTC.
pub fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(NaiveTime::MIN).and_utc()
}

/// Human label for the distance between `event` and `now`.
/// Events in the future read as "Less than an hour ago".
pub fn relative_time(event: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - event).num_hours();
    if hours < 1 {
        "Less than an hour ago".to_string()
    } else if hours == 1 {
        "1 hour ago".to_string()
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if hours < 48 {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", hours / 24)
    }
}

fn describe(ev: &ActivityEvent) -> String {
    match ev {
        ActivityEvent::Payment {
            tenant_name,
            unit_id,
            ..
        } => {
            let mut s = "Payment received".to_string();
            if let Some(name) = tenant_name.as_deref().filter(|n| !n.is_empty()) {
                s.push_str(" from ");
                s.push_str(name);
            }
            with_unit(s, unit_id.as_deref())
        }
        ActivityEvent::MoveIn {
            tenant_name,
            unit_id,
            ..
        } => {
            let who = if tenant_name.is_empty() {
                "New tenant"
            } else {
                tenant_name.as_str()
            };
            with_unit(format!("{} moved in", who), unit_id.as_deref())
        }
        ActivityEvent::Maintenance {
            unit_id,
            damage_type,
            ..
        } => with_unit(
            format!("{} damage reported", capitalize(damage_type.trim())),
            unit_id.as_deref(),
        ),
    }
}

fn with_unit(mut s: String, unit: Option<&str>) -> String {
    if let Some(u) = unit.filter(|u| !u.is_empty()) {
        s.push_str(" (");
        s.push_str(u);
        s.push(')');
    }
    s
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => "Unspecified".to_string(),
    }
}
