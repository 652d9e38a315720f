// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

// Stats blocks, as returned by the `/<collection>/stats/` endpoints.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub total_units: u64,
    pub occupied_units: u64,
    pub vacant_units: u64,
    pub maintenance_units: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantStats {
    pub total_tenants: u64,
    pub active_tenants: u64,
    pub inactive_tenants: u64,
    pub moved_out_tenants: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    #[serde(default)]
    pub total_payments: u64,
    pub completed_payments: u64,
    pub pending_payments: u64,
    #[serde(default)]
    pub failed_payments: u64,
    pub overdue_payments: u64,
    #[serde(deserialize_with = "flex::decimal")]
    pub total_amount: Decimal,
    #[serde(deserialize_with = "flex::decimal")]
    pub pending_amount: Decimal,
    #[serde(deserialize_with = "flex::decimal")]
    pub overdue_amount: Decimal,
    #[serde(deserialize_with = "flex::decimal")]
    pub this_month_amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageStats {
    pub total_reports: u64,
    pub pending_reports: u64,
    #[serde(default)]
    pub in_progress_reports: u64,
    pub repaired_reports: u64,
    pub unrepaired_reports: u64,
}

// Raw records.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
    Overdue,
    Cancelled,
    Other,
}

impl PaymentStatus {
    pub fn from_label(s: &str) -> Self {
        match normalize_label(s).as_str() {
            "completed" | "paid" => PaymentStatus::Completed,
            "pending" => PaymentStatus::Pending,
            "failed" => PaymentStatus::Failed,
            "overdue" => PaymentStatus::Overdue,
            "cancelled" | "canceled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other => "other",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
    MovedOut,
    Other,
}

impl TenantStatus {
    pub fn from_label(s: &str) -> Self {
        match normalize_label(s).as_str() {
            "active" => TenantStatus::Active,
            "inactive" => TenantStatus::Inactive,
            "moved_out" => TenantStatus::MovedOut,
            _ => TenantStatus::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
            TenantStatus::MovedOut => "moved_out",
            TenantStatus::Other => "other",
        }
    }
}

impl FromStr for TenantStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(PaymentStatus::from_label(&String::deserialize(d)?))
    }
}

impl<'de> Deserialize<'de> for TenantStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(TenantStatus::from_label(&String::deserialize(d)?))
    }
}

/// Lowercase, with spaces and hyphens folded into underscores:
/// "Moved Out", "moved-out" and "moved_out" compare equal.
pub fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(deserialize_with = "flex::id")]
    pub id: String,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default, deserialize_with = "flex::id_opt")]
    pub unit_id: Option<String>,
    #[serde(deserialize_with = "flex::decimal")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    #[serde(deserialize_with = "flex::date")]
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TenantRecord")]
pub struct Tenant {
    pub id: String,
    pub full_name: String,
    pub status: TenantStatus,
    pub move_in_date: Option<NaiveDate>,
    pub unit_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// Wire shape; the API sends `full_name` on newer serializers and only
// first/last on older ones.
#[derive(Deserialize)]
struct TenantRecord {
    #[serde(deserialize_with = "flex::id")]
    id: String,
    #[serde(default, alias = "name")]
    full_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    status: TenantStatus,
    #[serde(default, deserialize_with = "flex::date_opt")]
    move_in_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flex::id_opt")]
    unit_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl From<TenantRecord> for Tenant {
    fn from(r: TenantRecord) -> Self {
        let full_name = match r.full_name.filter(|n| !n.trim().is_empty()) {
            Some(n) => n.trim().to_string(),
            None => [r.first_name, r.last_name]
                .into_iter()
                .flatten()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Tenant {
            id: r.id,
            full_name,
            status: r.status,
            move_in_date: r.move_in_date,
            unit_id: r.unit_id,
            email: r.email,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    #[serde(deserialize_with = "flex::id")]
    pub id: String,
    pub damage_type: String,
    #[serde(default, deserialize_with = "flex::id_opt")]
    pub unit_id: Option<String>,
    #[serde(deserialize_with = "flex::date")]
    pub report_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "is_resolved")]
    pub repair_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(deserialize_with = "flex::id")]
    pub id: String,
    #[serde(default, deserialize_with = "flex::id_opt")]
    pub unit_id: Option<String>,
    #[serde(default, alias = "unit_number")]
    pub name: Option<String>,
    pub status: String,
    #[serde(default, alias = "rent_amount", deserialize_with = "flex::decimal_opt")]
    pub rent: Option<Decimal>,
    #[serde(default)]
    pub tenant_name: Option<String>,
}

/// List endpoints answer either with a bare array or with a paginated
/// envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Page { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListBody<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Page { results } => results,
            ListBody::Plain(v) => v,
        }
    }
}

/// Lenient field parsers. The API is inconsistent about money (string or
/// number), identifiers (string or integer) and dates (date or timestamp).
pub mod flex {
    use chrono::{DateTime, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Scalar::Text(s) => s.trim().to_string(),
                Scalar::Number(n) => n.to_string(),
            }
        }
    }

    pub fn parse_amount(s: &str) -> Result<Decimal, String> {
        let s = s.trim();
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| format!("invalid amount '{}'", s))
    }

    pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
        let s = s.trim();
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(d);
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s))
    }

    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let raw = Scalar::deserialize(d)?.into_string();
        parse_amount(&raw).map_err(D::Error::custom)
    }

    pub fn decimal_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        match Option::<Scalar>::deserialize(d)?.map(Scalar::into_string) {
            Some(raw) if !raw.is_empty() => parse_amount(&raw).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Scalar::deserialize(d)?.into_string())
    }

    pub fn id_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(d)?
            .map(Scalar::into_string)
            .filter(|s| !s.is_empty()))
    }

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).map_err(D::Error::custom)
    }

    pub fn date_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => {
                parse_date(&raw).map(Some).map_err(D::Error::custom)
            }
            _ => Ok(None),
        }
    }
}
