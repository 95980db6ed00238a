// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use tokio::sync::RwLock;

use crate::auth::{CookieSettings, PasswordError, PasswordVerifier, SessionPolicy, SessionStore};
use crate::config::{AppConfig, AuthConfig, Environment};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<PasswordVerifier>,
    pub sessions: Arc<RwLock<SessionStore>>,
    pub cookies: CookieSettings,
    pub policy: SessionPolicy,
    pub session_ttl: Duration,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(auth: &AuthConfig, environment: Environment) -> Result<Self, PasswordError> {
        Ok(Self {
            verifier: Arc::new(PasswordVerifier::new(auth)?),
            sessions: Arc::new(RwLock::new(SessionStore::new())),
            cookies: CookieSettings::admin(auth.session_ttl, environment.is_production()),
            policy: auth.session_policy,
            session_ttl: auth.session_ttl,
            started_at: Instant::now(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PasswordError> {
        Self::new(&config.auth, config.environment)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State in bootstrap mode (password `admin`) with a cheap hash.
    pub fn bootstrap_state(policy: SessionPolicy) -> AppState {
        let auth = AuthConfig {
            session_policy: policy,
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        AppState::new(&auth, Environment::Development).expect("test state")
    }
}
