// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Rentdash", "rentdash"));

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CURRENCY: &str = "KES";

pub const ENV_API_URL: &str = "RENTDASH_API_URL";
pub const ENV_TOKEN: &str = "RENTDASH_TOKEN";
pub const ENV_TIMEOUT: &str = "RENTDASH_TIMEOUT_SECS";
pub const ENV_CURRENCY: &str = "RENTDASH_CURRENCY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Base URL without a trailing slash, so endpoint paths can be appended.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Layer environment and command-line values over `self`.
    /// `env` is a lookup so tests never have to touch the process environment.
    pub fn layered<F>(mut self, env: F, cli: &Overrides) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = v.trim().to_string();
        }
        if let Some(v) = env(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.token = Some(v.trim().to_string());
        }
        if let Some(v) = env(ENV_TIMEOUT) {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", ENV_TIMEOUT, v))?;
        }
        if let Some(v) = env(ENV_CURRENCY).filter(|v| !v.trim().is_empty()) {
            self.currency = v.trim().to_uppercase();
        }

        if let Some(v) = &cli.api_url {
            self.api_url = v.trim().to_string();
        }
        if let Some(v) = &cli.token {
            self.token = Some(v.trim().to_string());
        }
        if let Some(v) = cli.timeout_secs {
            self.timeout_secs = v;
        }
        Ok(self)
    }

    /// Set one key by name, as `config set` does.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "api_url" => self.api_url = value.to_string(),
            "token" => {
                self.token = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "timeout_secs" => {
                self.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}'", value))?
            }
            "currency" => self.currency = value.to_uppercase(),
            other => {
                return Err(anyhow!(
                    "Unknown config key '{}' (use api_url|token|timeout_secs|currency)",
                    other
                ));
            }
        }
        Ok(())
    }

    /// Token shown as a short prefix only.
    pub fn redacted_token(&self) -> String {
        match &self.token {
            None => "(none)".to_string(),
            Some(t) if t.chars().count() <= 4 => "****".to_string(),
            Some(t) => format!("{}****", t.chars().take(4).collect::<String>()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir).context("Failed to create config dir")?;
    Ok(dir.join("config.json"))
}

/// Read a config file; a missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read config at {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parse config at {}", path.display()))
}

pub fn save_to(path: &Path, cfg: &Config) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(cfg)?)
        .with_context(|| format!("Write config at {}", path.display()))
}

/// File, then environment, then command line.
pub fn resolve(cli: &Overrides) -> Result<Config> {
    let path = config_path()?;
    load_from(&path)?.layered(|k| std::env::var(k).ok(), cli)
}
