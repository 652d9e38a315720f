// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use rentdash::api::{PropertyApi, endpoints};
use rentdash::error::ApiError;
use rentdash::models::{
    DamageReport, DamageStats, Payment, PaymentStats, PaymentStatus, Tenant, TenantStats,
    TenantStatus, Unit, UnitStats,
};

/// In-memory `PropertyApi`. One endpoint can be made to fail or to hang,
/// and every read can be slowed by `delay`.
#[derive(Clone, Default)]
pub struct FakeApi {
    pub unit_stats: UnitStats,
    pub tenant_stats: TenantStats,
    pub payment_stats: PaymentStats,
    pub damage_stats: DamageStats,
    pub payments: Vec<Payment>,
    pub tenants: Vec<Tenant>,
    pub reports: Vec<DamageReport>,
    pub units: Vec<Unit>,
    pub fail: Option<&'static str>,
    pub stall: Option<&'static str>,
    pub delay: Option<Duration>,
    pub calls: Arc<AtomicUsize>,
    pub in_flight: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most reads that were pending at the same moment.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn gate(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.stall == Some(endpoint) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail == Some(endpoint) {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PropertyApi for FakeApi {
    async fn unit_stats(&self) -> Result<UnitStats, ApiError> {
        self.gate(endpoints::UNIT_STATS).await?;
        Ok(self.unit_stats.clone())
    }

    async fn tenant_stats(&self) -> Result<TenantStats, ApiError> {
        self.gate(endpoints::TENANT_STATS).await?;
        Ok(self.tenant_stats.clone())
    }

    async fn payment_stats(&self) -> Result<PaymentStats, ApiError> {
        self.gate(endpoints::PAYMENT_STATS).await?;
        Ok(self.payment_stats.clone())
    }

    async fn damage_stats(&self) -> Result<DamageStats, ApiError> {
        self.gate(endpoints::DAMAGE_STATS).await?;
        Ok(self.damage_stats.clone())
    }

    async fn payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.gate(endpoints::PAYMENTS).await?;
        Ok(self.payments.clone())
    }

    async fn tenants(&self) -> Result<Vec<Tenant>, ApiError> {
        self.gate(endpoints::TENANTS).await?;
        Ok(self.tenants.clone())
    }

    async fn damage_reports(&self) -> Result<Vec<DamageReport>, ApiError> {
        self.gate(endpoints::DAMAGE_REPORTS).await?;
        Ok(self.reports.clone())
    }

    async fn units(&self) -> Result<Vec<Unit>, ApiError> {
        self.gate(endpoints::UNITS).await?;
        Ok(self.units.clone())
    }

    async fn health(&self) -> Result<(), ApiError> {
        self.gate(endpoints::HEALTH).await
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn payment(id: &str, status: PaymentStatus, on: NaiveDate, amount: &str) -> Payment {
    Payment {
        id: id.to_string(),
        tenant_name: Some(format!("Tenant {}", id)),
        unit_id: Some(format!("U-{}", id)),
        amount: dec(amount),
        status,
        payment_date: on,
    }
}

pub fn tenant(id: &str, name: &str, status: TenantStatus, moved_in: Option<NaiveDate>) -> Tenant {
    Tenant {
        id: id.to_string(),
        full_name: name.to_string(),
        status,
        move_in_date: moved_in,
        unit_id: Some(format!("U-{}", id)),
        email: None,
        phone: None,
    }
}

pub fn report(id: &str, damage_type: &str, unit: &str, on: NaiveDate) -> DamageReport {
    DamageReport {
        id: id.to_string(),
        damage_type: damage_type.to_string(),
        unit_id: Some(unit.to_string()),
        report_date: on,
        description: None,
        repair_completed: false,
    }
}

/// A small portfolio with 3 completed payments, 2 move-ins and 2 damage
/// reports, all on distinct days in August 2025.
pub fn sample_api() -> FakeApi {
    FakeApi {
        unit_stats: UnitStats {
            total_units: 20,
            occupied_units: 15,
            vacant_units: 4,
            maintenance_units: 1,
        },
        tenant_stats: TenantStats {
            total_tenants: 17,
            active_tenants: 15,
            inactive_tenants: 1,
            moved_out_tenants: 1,
        },
        payment_stats: PaymentStats {
            total_payments: 40,
            completed_payments: 30,
            pending_payments: 6,
            failed_payments: 1,
            overdue_payments: 3,
            total_amount: dec("90000"),
            pending_amount: dec("20000"),
            overdue_amount: dec("5000"),
            this_month_amount: dec("75000"),
        },
        damage_stats: DamageStats {
            total_reports: 5,
            pending_reports: 2,
            in_progress_reports: 1,
            repaired_reports: 2,
            unrepaired_reports: 3,
        },
        payments: vec![
            payment("p1", PaymentStatus::Completed, date(2025, 8, 10), "25000"),
            payment("p2", PaymentStatus::Pending, date(2025, 8, 14), "12000"),
            payment("p3", PaymentStatus::Completed, date(2025, 8, 12), "30000"),
            payment("p4", PaymentStatus::Completed, date(2025, 8, 3), "18000"),
        ],
        tenants: vec![
            tenant("t1", "Sarah Johnson", TenantStatus::Active, Some(date(2025, 8, 11))),
            tenant("t2", "Mike Wilson", TenantStatus::Active, Some(date(2025, 8, 5))),
            tenant("t3", "Old Tenant", TenantStatus::MovedOut, Some(date(2025, 8, 13))),
        ],
        reports: vec![
            report("r1", "plumbing", "C-301", date(2025, 8, 9)),
            report("r2", "electrical", "A-102", date(2025, 8, 1)),
        ],
        ..FakeApi::default()
    }
}
