// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin password verification.
//!
//! Two hash formats are understood:
//!
//! - **bcrypt** (`$2a$`, `$2b$`, `$2y$`): preferred, available when the crate
//!   is built with the `bcrypt` feature (on by default).
//! - **salted SHA-256**: lowercase hex of `SHA-256(password || secret)`. Used
//!   when bcrypt is not compiled in, or when the configured hash is in this
//!   format. Compared in constant time.
//!
//! The strategy is resolved once in [`PasswordVerifier::new`] and never
//! re-probed per request.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::{AuthConfig, BOOTSTRAP_ADMIN_PASSWORD};

/// Whether the bcrypt backend was compiled in.
pub const BCRYPT_AVAILABLE: bool = cfg!(feature = "bcrypt");

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("configured password hash is a bcrypt hash but bcrypt support is not compiled in")]
    BcryptUnavailable,
    #[error("configured password hash is neither bcrypt nor 64-character hex SHA-256")]
    MalformedHash,
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// Active hashing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashStrategy {
    /// Adaptive bcrypt hash with the given work factor for new hashes.
    Bcrypt { cost: u32 },
    /// `SHA-256(password || secret)`, hex encoded.
    SaltedSha256,
}

impl HashStrategy {
    /// Pick the strategy for a configured hash (or for bootstrap when `None`).
    pub fn detect(configured: Option<&str>, bcrypt_cost: u32) -> Result<Self, PasswordError> {
        match configured {
            Some(hash) if is_bcrypt_hash(hash) => {
                if BCRYPT_AVAILABLE {
                    Ok(HashStrategy::Bcrypt { cost: bcrypt_cost })
                } else {
                    Err(PasswordError::BcryptUnavailable)
                }
            }
            Some(hash) if is_sha256_hex(hash) => Ok(HashStrategy::SaltedSha256),
            Some(_) => Err(PasswordError::MalformedHash),
            None if BCRYPT_AVAILABLE => Ok(HashStrategy::Bcrypt { cost: bcrypt_cost }),
            None => Ok(HashStrategy::SaltedSha256),
        }
    }

    /// Short name used in logs and health output.
    pub fn name(&self) -> &'static str {
        match self {
            HashStrategy::Bcrypt { .. } => "bcrypt",
            HashStrategy::SaltedSha256 => "salted_sha256",
        }
    }

    /// Hash a password in this strategy's format.
    pub fn hash(&self, plain: &str, secret: &str) -> Result<String, PasswordError> {
        match self {
            HashStrategy::Bcrypt { cost } => bcrypt_hash(plain, *cost),
            HashStrategy::SaltedSha256 => Ok(salted_sha256_hex(plain, secret)),
        }
    }

    /// Check `plain` against `stored`. Never fails: any mismatch or
    /// unreadable hash is `false`.
    pub fn verify(&self, plain: &str, stored: &str, secret: &str) -> bool {
        match self {
            HashStrategy::Bcrypt { .. } => bcrypt_verify(plain, stored),
            HashStrategy::SaltedSha256 => {
                let computed = salted_sha256_hex(plain, secret);
                constant_time_eq(computed.as_bytes(), stored.as_bytes())
            }
        }
    }
}

/// Verifier for the single admin credential.
#[derive(Clone)]
pub struct PasswordVerifier {
    strategy: HashStrategy,
    stored_hash: String,
    secret: String,
    bootstrap: bool,
}

impl std::fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordVerifier")
            .field("strategy", &self.strategy)
            .field("bootstrap", &self.bootstrap)
            .finish_non_exhaustive()
    }
}

impl PasswordVerifier {
    /// Build the verifier from the injected configuration.
    ///
    /// With no configured hash, a hash of [`BOOTSTRAP_ADMIN_PASSWORD`] is
    /// synthesized with the active strategy.
    pub fn new(config: &AuthConfig) -> Result<Self, PasswordError> {
        let configured = config.password_hash.as_deref().map(str::trim);
        let strategy = HashStrategy::detect(configured, config.bcrypt_cost)?;

        let (stored_hash, bootstrap) = match configured {
            Some(hash) if strategy == HashStrategy::SaltedSha256 => {
                (hash.to_ascii_lowercase(), false)
            }
            Some(hash) => (hash.to_string(), false),
            None => (
                strategy.hash(BOOTSTRAP_ADMIN_PASSWORD, &config.session_secret)?,
                true,
            ),
        };

        Ok(Self {
            strategy,
            stored_hash,
            secret: config.session_secret.clone(),
            bootstrap,
        })
    }

    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Whether the verifier is running on the synthesized bootstrap credential.
    pub fn is_bootstrap(&self) -> bool {
        self.bootstrap
    }

    pub fn verify(&self, plain: &str) -> bool {
        self.strategy.verify(plain, &self.stored_hash, &self.secret)
    }

    /// Hash a password so it can be placed in `ADMIN_PASSWORD_HASH`.
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        self.strategy.hash(plain, &self.secret)
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

fn is_sha256_hex(hash: &str) -> bool {
    hash.len() == SHA256_HEX_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

fn salted_sha256_hex(plain: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(feature = "bcrypt")]
fn bcrypt_hash(plain: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(plain, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
}

#[cfg(not(feature = "bcrypt"))]
fn bcrypt_hash(_plain: &str, _cost: u32) -> Result<String, PasswordError> {
    Err(PasswordError::BcryptUnavailable)
}

#[cfg(feature = "bcrypt")]
fn bcrypt_verify(plain: &str, stored: &str) -> bool {
    match bcrypt::verify(plain, stored) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "bcrypt verification failed on stored hash");
            false
        }
    }
}

#[cfg(not(feature = "bcrypt"))]
fn bcrypt_verify(_plain: &str, _stored: &str) -> bool {
    false
}
