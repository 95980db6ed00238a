// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for admin sessions.
//!
//! Use the `AdminSession` extractor in API handlers to require a session and
//! reject with a 401 JSON body otherwise:
//!
//! ```rust,ignore
//! async fn my_handler(AdminSession(record): AdminSession) -> impl IntoResponse {
//!     // record is Option<SessionRecord>
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{gate, AuthError, SessionRecord};
use crate::state::AppState;

/// Extractor for a request carrying an admin session.
///
/// The record is `None` only under the presence-only policy when the cookie
/// does not match a known session.
pub struct AdminSession(pub Option<SessionRecord>);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // The middleware may already have resolved the session
        if let Some(record) = parts.extensions.get::<SessionRecord>().cloned() {
            return Ok(AdminSession(Some(record)));
        }

        let record = gate::check_session(state, &parts.headers).await?;
        Ok(AdminSession(record))
    }
}
