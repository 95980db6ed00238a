// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The admin session gate.
//!
//! Pure inspection of the request's cookies plus a read-locked lookup in the
//! session registry; nothing is written.

use axum::http::HeaderMap;
use chrono::Utc;

use super::{AuthError, SessionPolicy, SessionRecord};
use crate::state::AppState;

/// Check the request's admin session.
///
/// Under [`SessionPolicy::PresenceOnly`] any non-empty cookie passes and the
/// record is returned only if the registry happens to know the token. Under
/// [`SessionPolicy::Validated`] the token must map to a live record.
pub async fn check_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<SessionRecord>, AuthError> {
    let token = state.cookies.read(headers).ok_or(AuthError::MissingSession)?;
    let record = state
        .sessions
        .read()
        .await
        .validate(token, Utc::now())
        .cloned();

    match (state.policy, record) {
        (_, Some(record)) => Ok(Some(record)),
        (SessionPolicy::PresenceOnly, None) => Ok(None),
        (SessionPolicy::Validated, None) => Err(AuthError::InvalidSession),
    }
}

pub async fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    check_session(state, headers).await.is_ok()
}
