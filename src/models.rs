// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{SessionPolicy, SessionRecord};

/// Body of `POST /api/admin/auth`.
///
/// `action` is kept as a string so an unknown value maps to a 400 with a
/// readable message rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthRequest {
    /// `login` or `logout`.
    #[schema(example = "login")]
    pub action: String,
    /// Admin password; required for `login`.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Logout,
}

impl AuthAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "login" => Some(AuthAction::Login),
            "logout" => Some(AuthAction::Logout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
}

/// Body of `GET /api/admin/auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthStatusResponse {
    pub success: bool,
    pub authenticated: bool,
}

/// Body of `GET /admin/login`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginPageResponse {
    pub authenticated: bool,
    /// Endpoint accepting `{ "action": "login", "password": .. }`.
    pub login_endpoint: String,
}

/// Body of `GET /admin`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub status: String,
    pub active_sessions: usize,
    pub session_policy: SessionPolicy,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Body of `GET /api/admin/session`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionInfoResponse {
    pub session_policy: SessionPolicy,
    /// Absent under the presence-only policy when the cookie is unknown to
    /// the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionRecord>,
    pub active_sessions: usize,
}
