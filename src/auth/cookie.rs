// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie issuance, clearing and parsing.
//!
//! Every `Set-Cookie` value is rendered from one [`CookieSettings`], so the
//! issuing and clearing headers always carry the same attribute set.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::Duration;

use super::SessionToken;

/// Name of the admin session cookie.
pub const ADMIN_SESSION_COOKIE: &str = "admin_session";

const EXPIRED_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Attributes applied to the admin session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: &'static str,
    pub path: &'static str,
    /// Lifetime in seconds.
    pub max_age: i64,
    /// Adds the `Secure` attribute. On in production.
    pub secure: bool,
}

impl CookieSettings {
    pub fn admin(ttl: Duration, secure: bool) -> Self {
        Self {
            name: ADMIN_SESSION_COOKIE,
            path: "/",
            max_age: ttl.num_seconds(),
            secure,
        }
    }

    fn attributes(&self) -> String {
        let mut attrs = format!("; Path={}; HttpOnly; SameSite=Lax", self.path);
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// `Set-Cookie` value issuing a session.
    pub fn set_session_cookie(&self, token: &SessionToken) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&format!(
            "{}={}{}; Max-Age={}",
            self.name,
            token.as_str(),
            self.attributes(),
            self.max_age
        ))
    }

    /// `Set-Cookie` value deleting the session cookie in the browser.
    pub fn clear_session_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&format!(
            "{}={}; Max-Age=0; Expires={}",
            self.name,
            self.attributes(),
            EXPIRED_DATE
        ))
    }

    /// The session cookie value carried by a request, if non-empty.
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        read_cookie(headers, self.name)
    }
}

/// Find a cookie by name across all `Cookie` headers.
///
/// Empty values are skipped, so a stale empty duplicate does not hide a
/// later non-empty one. Returns `None` when no non-empty value is present.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}
