// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin login, logout and auth-check endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::{
    auth::{gate, AuthError},
    error::ApiError,
    models::{AuthAction, AuthRequest, AuthResponse, AuthStatusResponse},
    state::AppState,
};

/// Log in or log out.
///
/// `login` verifies the admin password and sets the `admin_session` cookie.
/// `logout` revokes the presented session and clears the cookie; it always
/// succeeds, with or without a session.
#[utoipa::path(
    post,
    path = "/api/admin/auth",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Logged in (cookie set) or logged out (cookie cleared)", body = AuthResponse),
        (status = 400, description = "Missing password, unknown action or malformed body"),
        (status = 401, description = "Invalid password"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn auth_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e.body_text(), "Rejected admin auth request body");
        ApiError::bad_request("Invalid request body")
    })?;

    match AuthAction::parse(&request.action) {
        Some(AuthAction::Login) => login(&state, request.password).await,
        Some(AuthAction::Logout) => logout(&state, &headers).await,
        None => Err(ApiError::bad_request("Invalid action")),
    }
}

async fn login(state: &AppState, password: Option<String>) -> Result<Response, ApiError> {
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let verifier = Arc::clone(&state.verifier);
    let valid = tokio::task::spawn_blocking(move || verifier.verify(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            ApiError::internal()
        })?;

    if !valid {
        warn!("Admin login rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    let (token, record) = state
        .sessions
        .write()
        .await
        .issue(state.session_ttl, Utc::now())?;

    let cookie = state.cookies.set_session_cookie(&token).map_err(|e| {
        error!(error = %e, "Failed to build session cookie");
        ApiError::internal()
    })?;

    info!(
        session_id = %record.session_id,
        expires_at = %record.expires_at,
        "Admin session issued"
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse { success: true }),
    )
        .into_response())
}

async fn logout(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = state.cookies.read(headers) {
        if let Some(record) = state.sessions.write().await.revoke(token) {
            info!(session_id = %record.session_id, "Admin session revoked");
        }
    }

    let cookie = state.cookies.clear_session_cookie().map_err(|e| {
        error!(error = %e, "Failed to build clearing cookie");
        ApiError::internal()
    })?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse { success: true }),
    )
        .into_response())
}

/// Report whether the request carries a valid admin session.
#[utoipa::path(
    get,
    path = "/api/admin/auth",
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated", body = AuthStatusResponse),
        (status = 401, description = "Not authenticated", body = AuthStatusResponse)
    )
)]
pub async fn auth_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<AuthStatusResponse>) {
    if gate::is_authenticated(&state, &headers).await {
        (
            StatusCode::OK,
            Json(AuthStatusResponse {
                success: true,
                authenticated: true,
            }),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(AuthStatusResponse {
                success: false,
                authenticated: false,
            }),
        )
    }
}
