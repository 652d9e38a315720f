// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dashboard::{Aggregator, DashboardSnapshot};

/// Lifecycle of one dashboard load.
///
/// `Loading -> Ready | Failed`, and `Failed -> Loading` only through
/// [`DashboardView::retry`]. There is no partial state and nothing retries
/// on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Box<DashboardSnapshot>),
    Failed(String),
}

impl LoadState {
    pub fn name(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        }
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            LoadState::Ready(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The join settled and its result is now the view state.
    Applied,
    /// The view was torn down first; the result was dropped.
    Discarded,
    /// The view was not in `Loading`; nothing was fetched.
    Skipped,
}

/// Owns the load state for one consumer and scopes in-flight loads to its
/// lifetime.
#[derive(Debug)]
pub struct DashboardView {
    state: LoadState,
    token: CancellationToken,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        DashboardView {
            state: LoadState::Loading,
            token: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Handle that tears the view down from elsewhere (a signal handler, a
    /// parent task).
    pub fn cancel_handle(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// `Failed -> Loading`. Returns false from any other state.
    pub fn retry(&mut self) -> bool {
        if self.is_torn_down() {
            return false;
        }
        match self.state {
            LoadState::Failed(_) => {
                debug!("retry requested");
                self.state = LoadState::Loading;
                true
            }
            _ => false,
        }
    }

    pub async fn load(&mut self, aggregator: &Aggregator, now: DateTime<Utc>) -> LoadOutcome {
        if self.is_torn_down() {
            return LoadOutcome::Discarded;
        }
        if !matches!(self.state, LoadState::Loading) {
            return LoadOutcome::Skipped;
        }

        let result = tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            r = aggregator.load(now) => Some(r),
        };
        let Some(result) = result else {
            debug!("view torn down before load settled; discarding");
            return LoadOutcome::Discarded;
        };
        if self.is_torn_down() {
            return LoadOutcome::Discarded;
        }

        self.state = match result {
            Ok(snapshot) => LoadState::Ready(Box::new(snapshot)),
            Err(e) => {
                warn!(error = %e, "dashboard unavailable");
                LoadState::Failed(e.summary())
            }
        };
        LoadOutcome::Applied
    }
}
