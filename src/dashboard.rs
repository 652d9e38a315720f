// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::{info, warn};

use crate::activity::{self, ActivityEntry};
use crate::api::{PropertyApi, endpoints};
use crate::error::{ApiError, DashboardError, FetchFailure};
use crate::models::{DamageStats, PaymentStats, TenantStats, UnitStats};

/// Everything the dashboard shows for one load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub as_of: DateTime<Utc>,
    pub units: UnitStats,
    pub tenants: TenantStats,
    pub payments: PaymentStats,
    pub damage: DamageStats,
    /// Percent of units occupied.
    pub occupancy_rate: f64,
    /// Percent of this month's receivables already collected.
    pub collection_progress: f64,
    pub activity: Vec<ActivityEntry>,
}

/// `occupied / total * 100`, or 0 with no units.
pub fn occupancy_rate(units: &UnitStats) -> f64 {
    if units.total_units == 0 {
        return 0.0;
    }
    units.occupied_units as f64 / units.total_units as f64 * 100.0
}

/// `this_month / (this_month + pending + overdue) * 100`, or 0 when nothing
/// is due or the totals overflow.
pub fn collection_progress(p: &PaymentStats) -> f64 {
    p.this_month_amount
        .checked_add(p.pending_amount)
        .and_then(|d| d.checked_add(p.overdue_amount))
        .filter(|due| !due.is_zero())
        .and_then(|due| p.this_month_amount.checked_div(due))
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

/// Fans out the dashboard reads and joins them. All reads settle before
/// anything is inspected; one failure fails the whole load.
pub struct Aggregator {
    api: Arc<dyn PropertyApi>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(api: Arc<dyn PropertyApi>, timeout: Duration) -> Self {
        Aggregator { api, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, endpoint: &'static str, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(r) => r,
            Err(_) => Err(ApiError::Timeout {
                endpoint: endpoint.to_string(),
                timeout: self.timeout,
            }),
        }
    }

    pub async fn load(&self, now: DateTime<Utc>) -> Result<DashboardSnapshot, DashboardError> {
        let api = self.api.as_ref();
        let (units, tenants, payments, damage, payment_list, tenant_list, report_list) = tokio::join!(
            self.bounded(endpoints::UNIT_STATS, api.unit_stats()),
            self.bounded(endpoints::TENANT_STATS, api.tenant_stats()),
            self.bounded(endpoints::PAYMENT_STATS, api.payment_stats()),
            self.bounded(endpoints::DAMAGE_STATS, api.damage_stats()),
            self.bounded(endpoints::PAYMENTS, api.payments()),
            self.bounded(endpoints::TENANTS, api.tenants()),
            self.bounded(endpoints::DAMAGE_REPORTS, api.damage_reports()),
        );

        let mut failures = Vec::new();
        let units = settle(endpoints::UNIT_STATS, units, &mut failures);
        let tenants = settle(endpoints::TENANT_STATS, tenants, &mut failures);
        let payments = settle(endpoints::PAYMENT_STATS, payments, &mut failures);
        let damage = settle(endpoints::DAMAGE_STATS, damage, &mut failures);
        let payment_list = settle(endpoints::PAYMENTS, payment_list, &mut failures);
        let tenant_list = settle(endpoints::TENANTS, tenant_list, &mut failures);
        let report_list = settle(endpoints::DAMAGE_REPORTS, report_list, &mut failures);

        let (
            Some(units),
            Some(tenants),
            Some(payments),
            Some(damage),
            Some(payment_list),
            Some(tenant_list),
            Some(report_list),
        ) = (
            units,
            tenants,
            payments,
            damage,
            payment_list,
            tenant_list,
            report_list,
        )
        else {
            warn!(failed = failures.len(), "dashboard load failed");
            return Err(DashboardError::LoadFailed { failures });
        };

        let activity = activity::synthesize(&payment_list, &tenant_list, &report_list, now);
        let snapshot = DashboardSnapshot {
            as_of: now,
            occupancy_rate: occupancy_rate(&units),
            collection_progress: collection_progress(&payments),
            units,
            tenants,
            payments,
            damage,
            activity,
        };
        info!(
            activity = snapshot.activity.len(),
            occupancy_rate = snapshot.occupancy_rate,
            "dashboard snapshot built"
        );
        Ok(snapshot)
    }

    /// Only the activity feed: the three raw collections, same join policy.
    pub async fn recent_activity(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActivityEntry>, DashboardError> {
        let api = self.api.as_ref();
        let (payment_list, tenant_list, report_list) = tokio::join!(
            self.bounded(endpoints::PAYMENTS, api.payments()),
            self.bounded(endpoints::TENANTS, api.tenants()),
            self.bounded(endpoints::DAMAGE_REPORTS, api.damage_reports()),
        );

        let mut failures = Vec::new();
        let payment_list = settle(endpoints::PAYMENTS, payment_list, &mut failures);
        let tenant_list = settle(endpoints::TENANTS, tenant_list, &mut failures);
        let report_list = settle(endpoints::DAMAGE_REPORTS, report_list, &mut failures);

        let (Some(payment_list), Some(tenant_list), Some(report_list)) =
            (payment_list, tenant_list, report_list)
        else {
            warn!(failed = failures.len(), "activity load failed");
            return Err(DashboardError::LoadFailed { failures });
        };
        Ok(activity::synthesize(
            &payment_list,
            &tenant_list,
            &report_list,
            now,
        ))
    }
}

fn settle<T>(
    endpoint: &'static str,
    result: Result<T, ApiError>,
    failures: &mut Vec<FetchFailure>,
) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(error) => {
            warn!(endpoint, kind = error.kind(), error = %error, "fetch failed");
            failures.push(FetchFailure { endpoint, error });
            None
        }
    }
}
