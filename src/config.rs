// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed configuration read once at startup. Handlers never read the
//! environment themselves; the parsed [`AppConfig`] is injected through
//! [`crate::state::AppState`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ADMIN_PASSWORD_HASH` | Precomputed hash of the admin password (bcrypt or salted SHA-256 hex) | Synthesized from `admin` |
//! | `ADMIN_SESSION_SECRET` | Salt for the SHA-256 fallback hash | Insecure built-in value |
//! | `NODE_ENV` / `APP_ENV` | `production` enables the `Secure` cookie attribute | `development` |
//! | `SESSION_POLICY` | `validated` or `presence` | `validated` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; both set enables HTTPS | Unset (plain HTTP) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use crate::auth::SessionPolicy;

/// Environment variable holding the precomputed admin password hash.
pub const ADMIN_PASSWORD_HASH_ENV: &str = "ADMIN_PASSWORD_HASH";

/// Environment variable holding the salt used by the fallback hash.
pub const ADMIN_SESSION_SECRET_ENV: &str = "ADMIN_SESSION_SECRET";

/// Deployment environment, kept under its historical name.
pub const NODE_ENV_ENV: &str = "NODE_ENV";

/// Deployment environment. Takes precedence over `NODE_ENV`.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Selects how the session gate treats a cookie.
pub const SESSION_POLICY_ENV: &str = "SESSION_POLICY";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Logging output format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Password accepted when no hash is configured.
///
/// This is a bootstrap convenience for fresh deployments, not a security
/// boundary. Startup logs a warning whenever it is in effect.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin";

/// Salt used by the fallback hash when `ADMIN_SESSION_SECRET` is unset.
pub const DEFAULT_SESSION_SECRET: &str = "block-bank-admin-insecure-default";

/// Admin session lifetime in seconds (24 hours).
pub const ADMIN_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{0} is set but {1} is missing; both are required for TLS")]
    IncompleteTls(&'static str, &'static str),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Admin credential and session settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Precomputed hash of the admin password. `None` means bootstrap mode.
    pub password_hash: Option<String>,
    /// Salt for the SHA-256 fallback hash.
    pub session_secret: String,
    /// How the session gate treats a presented cookie.
    pub session_policy: SessionPolicy,
    /// Session lifetime, used for both the cookie max-age and the
    /// server-side record.
    pub session_ttl: Duration,
    /// bcrypt work factor used when a hash has to be synthesized.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_hash: None,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_policy: SessionPolicy::default(),
            session_ttl: Duration::seconds(ADMIN_SESSION_TTL_SECS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

#[cfg(feature = "bcrypt")]
const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(not(feature = "bcrypt"))]
const DEFAULT_BCRYPT_COST: u32 = 12;

/// PEM certificate and key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tls: None,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub environment: Environment,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = get(APP_ENV_ENV)
            .or_else(|| get(NODE_ENV_ENV))
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let session_policy = match get(SESSION_POLICY_ENV) {
            Some(value) => {
                SessionPolicy::parse(&value).ok_or(ConfigError::InvalidValue {
                    name: SESSION_POLICY_ENV,
                    value,
                })?
            }
            None => SessionPolicy::default(),
        };

        let auth = AuthConfig {
            password_hash: get(ADMIN_PASSWORD_HASH_ENV),
            session_secret: get(ADMIN_SESSION_SECRET_ENV)
                .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string()),
            session_policy,
            ..AuthConfig::default()
        };

        let port = match get(PORT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteTls(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV))
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteTls(TLS_KEY_PATH_ENV, TLS_CERT_PATH_ENV))
            }
            (None, None) => None,
        };

        let server = ServerConfig {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            tls,
        };

        Ok(Self {
            environment,
            auth,
            server,
        })
    }

    /// Whether the fallback salt is still the built-in default.
    pub fn uses_default_secret(&self) -> bool {
        self.auth.session_secret == DEFAULT_SESSION_SECRET
    }
}
