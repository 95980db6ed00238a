// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access-control middleware for the admin area.
//!
//! Applied to the whole router with
//! `axum::middleware::from_fn_with_state(state, require_admin_session)`.
//! One decision per request:
//!
//! - path outside the protected prefixes, or a login path: pass through
//! - gate passes: pass through (with the session record in extensions)
//! - gate fails on an `/admin` UI path: `303 See Other` to `/admin/login`
//! - gate fails on an `/api/admin` path: `401` JSON

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::gate;
use crate::state::AppState;

/// Protected UI prefix.
pub const ADMIN_PREFIX: &str = "/admin";

/// Protected API prefix.
pub const ADMIN_API_PREFIX: &str = "/api/admin";

/// Public login page; target of the redirect.
pub const LOGIN_PATH: &str = "/admin/login";

/// Login/logout/auth-check endpoint; must stay reachable without a session.
pub const AUTH_API_PATH: &str = "/api/admin/auth";

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether a request path needs an admin session.
pub fn requires_session(path: &str) -> bool {
    if path == LOGIN_PATH || path == AUTH_API_PATH {
        return false;
    }
    under(path, ADMIN_PREFIX) || under(path, ADMIN_API_PREFIX)
}

/// Authentication middleware function.
pub async fn require_admin_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if !requires_session(&path) {
        return next.run(request).await;
    }

    match gate::check_session(&state, request.headers()).await {
        Ok(record) => {
            if let Some(record) = record {
                request.extensions_mut().insert(record);
            }
            next.run(request).await
        }
        Err(e) if under(&path, ADMIN_API_PREFIX) => e.into_response(),
        Err(e) => {
            tracing::debug!(path = %path, reason = %e, "Redirecting to admin login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
