// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod activity;
pub mod config;
pub mod damage;
pub mod dashboard;
pub mod exporter;
pub mod health;
pub mod payments;
pub mod tenants;
pub mod units;

use std::sync::Arc;

use crate::api::PropertyApi;
use crate::config::Config;
use crate::dashboard::Aggregator;

/// What every command needs: the effective settings and a client bound to
/// the current session.
pub struct Context {
    pub cfg: Config,
    pub api: Arc<dyn PropertyApi>,
}

impl Context {
    pub fn new(cfg: Config, api: Arc<dyn PropertyApi>) -> Self {
        Context { cfg, api }
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(self.api.clone(), self.cfg.timeout())
    }
}
