// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Sweeper
//!
//! Background task that periodically drops expired admin sessions from the
//! in-memory registry. Expired records are already rejected by the gate;
//! sweeping only bounds memory.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::auth::SessionStore;

/// Default interval between sweeps.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct SessionSweeper {
    sessions: Arc<RwLock<SessionStore>>,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<RwLock<SessionStore>>) -> Self {
        Self {
            sessions,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Session sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Session sweeper shutting down");
                    return;
                }
            }

            self.sweep_step().await;
        }
    }

    /// One sweep. Returns the number of records removed.
    pub async fn sweep_step(&self) -> usize {
        let removed = self.sessions.write().await.purge_expired(Utc::now());
        if removed > 0 {
            debug!(removed, "Purged expired admin sessions");
        }
        removed
    }
}
