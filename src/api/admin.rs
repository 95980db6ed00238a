// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin area endpoints.
//!
//! Everything here except the login page sits behind
//! [`crate::auth::middleware::require_admin_session`].

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;

use crate::{
    auth::{gate, middleware::AUTH_API_PATH, AdminSession},
    models::{DashboardResponse, LoginPageResponse, SessionInfoResponse},
    state::AppState,
};

/// Admin login page.
///
/// Public. Tells the client whether it is already logged in and where to
/// post credentials.
#[utoipa::path(
    get,
    path = "/admin/login",
    tag = "Admin",
    responses(
        (status = 200, description = "Login page data", body = LoginPageResponse)
    )
)]
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Json<LoginPageResponse> {
    Json(LoginPageResponse {
        authenticated: gate::is_authenticated(&state, &headers).await,
        login_endpoint: AUTH_API_PATH.to_string(),
    })
}

/// Admin dashboard summary.
#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 303, description = "No session; redirected to /admin/login")
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let now = Utc::now();
    let active_sessions = state.sessions.read().await.active_count(now);

    Json(DashboardResponse {
        status: "ok".to_string(),
        active_sessions,
        session_policy: state.policy,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: now,
    })
}

/// Current admin session details.
#[utoipa::path(
    get,
    path = "/api/admin/session",
    tag = "Admin",
    responses(
        (status = 200, description = "Session details", body = SessionInfoResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn session_info(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
) -> Json<SessionInfoResponse> {
    let active_sessions = state.sessions.read().await.active_count(Utc::now());

    Json(SessionInfoResponse {
        session_policy: state.policy,
        session,
        active_sessions,
    })
}
