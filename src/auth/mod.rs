// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cookie-based admin sessions for the Block Bank back office.
//!
//! ## Auth Flow
//!
//! 1. Admin posts `{ "action": "login", "password": ".." }` to `/api/admin/auth`
//! 2. Server:
//!    - Verifies the password against the configured hash (bcrypt, or the
//!      salted SHA-256 fallback)
//!    - Generates a 256-bit session token and records its digest
//!    - Sets the `admin_session` cookie (HttpOnly, SameSite=Lax, 24h)
//! 3. Subsequent requests under `/admin` and `/api/admin` pass the gate in
//!    [`middleware`] or are redirected / rejected
//! 4. Logout revokes the record and clears the cookie
//!
//! ## Security
//!
//! - No session cookie is ever issued without a verified password
//! - Fallback hash comparison is constant-time
//! - Tokens and passwords are never logged
//! - The gate policy (presence-only vs validated) is explicit configuration

pub mod cookie;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod session;

pub use cookie::{CookieSettings, ADMIN_SESSION_COOKIE};
pub use error::AuthError;
pub use extractor::AdminSession;
pub use password::{HashStrategy, PasswordError, PasswordVerifier};
pub use session::{
    create_session_token, SessionPolicy, SessionRecord, SessionStore, SessionToken,
};
