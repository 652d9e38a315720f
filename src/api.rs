// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    DamageReport, DamageStats, ListBody, Payment, PaymentStats, Tenant, TenantStats, Unit,
    UnitStats,
};

const UA: &str = concat!(
    "rentdash/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/rentdash)"
);

/// Longest slice of an error body kept in `ApiError::Status`.
const BODY_EXCERPT: usize = 200;

pub mod endpoints {
    pub const UNIT_STATS: &str = "/units/stats/";
    pub const TENANT_STATS: &str = "/tenants/stats/";
    pub const PAYMENT_STATS: &str = "/payments/stats/";
    pub const DAMAGE_STATS: &str = "/damage-reports/stats/";
    pub const PAYMENTS: &str = "/payments/";
    pub const TENANTS: &str = "/tenants/";
    pub const DAMAGE_REPORTS: &str = "/damage-reports/";
    pub const UNITS: &str = "/units/";
    pub const HEALTH: &str = "/health/";
}

/// Credentials for the current user. Token acquisition happens elsewhere;
/// this only carries the result into each request.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { token: None }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Session {
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Read access to the property API. Every method is an independent,
/// parameterless read scoped to the session the implementation was built with.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn unit_stats(&self) -> Result<UnitStats, ApiError>;
    async fn tenant_stats(&self) -> Result<TenantStats, ApiError>;
    async fn payment_stats(&self) -> Result<PaymentStats, ApiError>;
    async fn damage_stats(&self) -> Result<DamageStats, ApiError>;
    async fn payments(&self) -> Result<Vec<Payment>, ApiError>;
    async fn tenants(&self) -> Result<Vec<Tenant>, ApiError>;
    async fn damage_reports(&self) -> Result<Vec<DamageReport>, ApiError>;
    async fn units(&self) -> Result<Vec<Unit>, ApiError>;
    async fn health(&self) -> Result<(), ApiError>;
}

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(UA)
        .build()
        .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))
}

/// `PropertyApi` over HTTP/JSON.
pub struct HttpPropertyApi {
    client: reqwest::Client,
    base_url: String,
    session: Session,
    timeout: Duration,
}

impl HttpPropertyApi {
    pub fn new(cfg: &Config, session: Session) -> Result<Self, ApiError> {
        let base_url = cfg.base_url().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "API URL '{}' must start with http:// or https://",
                cfg.api_url
            )));
        }
        Ok(HttpPropertyApi {
            client: http_client(cfg.timeout())?,
            base_url,
            session,
            timeout: cfg.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ApiError> {
        match tokio::time::timeout(self.timeout, self.fetch(endpoint)).await {
            Ok(r) => r,
            Err(_) => Err(ApiError::Timeout {
                endpoint: endpoint.to_string(),
                timeout: self.timeout,
            }),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ApiError> {
        let bytes = self.fetch_bytes(endpoint).await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch_bytes(&self, endpoint: &'static str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "GET");

        let mut req = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }

        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.to_string(),
                    timeout: self.timeout,
                }
            } else {
                ApiError::Transport {
                    endpoint: endpoint.to_string(),
                    source: e,
                }
            }
        };

        let resp = req.send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT).collect(),
            });
        }
        let bytes = resp.bytes().await.map_err(transport)?;
        debug!(url = %url, status = status.as_u16(), len = bytes.len(), "response");
        Ok(bytes.to_vec())
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<Vec<T>, ApiError> {
        let body: ListBody<T> = self.get_json(endpoint).await?;
        Ok(body.into_vec())
    }
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn unit_stats(&self) -> Result<UnitStats, ApiError> {
        self.get_json(endpoints::UNIT_STATS).await
    }

    async fn tenant_stats(&self) -> Result<TenantStats, ApiError> {
        self.get_json(endpoints::TENANT_STATS).await
    }

    async fn payment_stats(&self) -> Result<PaymentStats, ApiError> {
        self.get_json(endpoints::PAYMENT_STATS).await
    }

    async fn damage_stats(&self) -> Result<DamageStats, ApiError> {
        self.get_json(endpoints::DAMAGE_STATS).await
    }

    async fn payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get_list(endpoints::PAYMENTS).await
    }

    async fn tenants(&self) -> Result<Vec<Tenant>, ApiError> {
        self.get_list(endpoints::TENANTS).await
    }

    async fn damage_reports(&self) -> Result<Vec<DamageReport>, ApiError> {
        self.get_list(endpoints::DAMAGE_REPORTS).await
    }

    async fn units(&self) -> Result<Vec<Unit>, ApiError> {
        self.get_list(endpoints::UNITS).await
    }

    async fn health(&self) -> Result<(), ApiError> {
        // Any 2xx counts; the body is not inspected.
        let endpoint = endpoints::HEALTH;
        match tokio::time::timeout(self.timeout, self.fetch_bytes(endpoint)).await {
            Ok(r) => r.map(|_| ()),
            Err(_) => Err(ApiError::Timeout {
                endpoint: endpoint.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}
