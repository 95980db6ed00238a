// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Block Bank Admin - Back-office Access Gate
//!
//! This crate provides the admin session layer for the Block Bank
//! RWA/crypto-lending platform: password verification for the shared admin
//! credential, cookie-based sessions, and the access-control middleware that
//! protects the admin area.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password verification, sessions, cookies and the gate
//! - `config` - Environment configuration
//! - `session_sweeper` - Background purge of expired sessions

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod session_sweeper;
pub mod state;
