//! Moto Shop server library.
//!
//! This crate provides the backend as a library, allowing it to be tested
//! and reused by the CLI.
//!
//! # Security
//!
//! Every account route is gated by [`security::RoleChecker`]: customers see
//! only their own account, admins and managers see all of them. The identity
//! itself is placed in the session by the sign-in flow and is only read here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod state;
