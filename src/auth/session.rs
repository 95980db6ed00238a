// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin session tokens and the server-side session registry.
//!
//! Tokens are 32 bytes from the OS CSPRNG, encoded as unpadded URL-safe
//! base64. The registry never holds a raw token: records are keyed by the
//! SHA-256 digest of the token, so a memory dump cannot be replayed as a
//! cookie.

use std::collections::HashMap;

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use super::AuthError;

/// Raw token length in bytes (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// How the session gate treats a presented cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Any non-empty `admin_session` cookie passes. No server-side check,
    /// so a forged cookie value is accepted.
    PresenceOnly,
    /// The cookie must match an unexpired, unrevoked record in the registry.
    #[default]
    Validated,
}

impl SessionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "presence" | "presence_only" | "presence-only" => Some(SessionPolicy::PresenceOnly),
            "validated" => Some(SessionPolicy::Validated),
            _ => None,
        }
    }
}

/// Opaque admin session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the system random source.
    pub fn generate() -> Result<Self, AuthError> {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| AuthError::InternalError("system random source unavailable".into()))?;
        Ok(Self(Base64UrlUnpadded::encode_string(&bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Generate a new session token.
pub fn create_session_token() -> Result<SessionToken, AuthError> {
    SessionToken::generate()
}

/// Server-side view of an issued session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionRecord {
    /// Identifier safe to log; unrelated to the token value.
    pub session_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

type TokenDigest = [u8; 32];

fn digest(token: &str) -> TokenDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(token.as_bytes()));
    out
}

/// In-memory registry of issued admin sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    records: HashMap<TokenDigest, SessionRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly generated token.
    pub fn insert(&mut self, token: &SessionToken, ttl: Duration, now: DateTime<Utc>) -> SessionRecord {
        let record = SessionRecord {
            session_id: Uuid::new_v4().to_string(),
            issued_at: now,
            expires_at: now + ttl,
        };
        self.records.insert(digest(token.as_str()), record.clone());
        record
    }

    /// Generate a token and record it in one step.
    pub fn issue(
        &mut self,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<(SessionToken, SessionRecord), AuthError> {
        let token = create_session_token()?;
        let record = self.insert(&token, ttl, now);
        Ok((token, record))
    }

    /// Look up a live session for a presented cookie value.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Option<&SessionRecord> {
        if token.is_empty() {
            return None;
        }
        self.records
            .get(&digest(token))
            .filter(|record| !record.is_expired(now))
    }

    /// Forget a session, returning its record if one existed. Revoking an
    /// unknown token is not an error.
    pub fn revoke(&mut self, token: &str) -> Option<SessionRecord> {
        self.records.remove(&digest(token))
    }

    /// Drop every record whose expiry has passed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before - self.records.len()
    }

    /// Number of live sessions at `now`.
    pub fn active_count(&self, now: DateTime<Utc>) -> usize {
        self.records
            .values()
            .filter(|record| !record.is_expired(now))
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn day() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn tokens_are_distinct_and_url_safe() {
        let tokens: HashSet<String> = (0..1_000)
            .map(|_| create_session_token().unwrap().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 1_000);

        for token in tokens.iter().take(10) {
            // 32 bytes -> 43 unpadded base64 characters.
            assert_eq!(token.len(), 43);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = create_session_token().unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains(token.as_str()));
    }

    #[test]
    fn issued_session_validates_until_expiry() {
        let mut store = SessionStore::new();
        let now = Utc::now();
        let (token, record) = store.issue(day(), now).unwrap();

        assert_eq!(record.expires_at - record.issued_at, day());
        assert_eq!(store.validate(token.as_str(), now), Some(&record));
        assert!(store
            .validate(token.as_str(), now + Duration::hours(23))
            .is_some());
        assert!(store.validate(token.as_str(), now + day()).is_none());
    }

    #[test]
    fn unknown_and_empty_tokens_do_not_validate() {
        let mut store = SessionStore::new();
        let now = Utc::now();
        store.issue(day(), now).unwrap();

        assert!(store.validate("", now).is_none());
        assert!(store.validate("forged-cookie-value", now).is_none());
    }

    #[test]
    fn revoke_is_idempotent() {
        let mut store = SessionStore::new();
        let now = Utc::now();
        let (token, record) = store.issue(day(), now).unwrap();

        assert_eq!(store.revoke(token.as_str()), Some(record));
        assert!(store.revoke(token.as_str()).is_none());
        assert!(store.validate(token.as_str(), now).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn purge_removes_only_expired_records() {
        let mut store = SessionStore::new();
        let now = Utc::now();
        let (old, _) = store.issue(Duration::minutes(5), now).unwrap();
        let (fresh, _) = store.issue(day(), now).unwrap();

        let later = now + Duration::minutes(10);
        assert_eq!(store.active_count(later), 1);
        assert_eq!(store.purge_expired(later), 1);
        assert_eq!(store.len(), 1);
        assert!(store.validate(old.as_str(), later).is_none());
        assert!(store.validate(fresh.as_str(), later).is_some());
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(SessionPolicy::parse("Validated"), Some(SessionPolicy::Validated));
        assert_eq!(SessionPolicy::parse("presence"), Some(SessionPolicy::PresenceOnly));
        assert_eq!(SessionPolicy::parse(" presence-only "), Some(SessionPolicy::PresenceOnly));
        assert_eq!(SessionPolicy::parse("none"), None);
        assert_eq!(SessionPolicy::default(), SessionPolicy::Validated);
    }
}
