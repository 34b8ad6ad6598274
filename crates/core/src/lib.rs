//! Moto Shop Core - Shared types library.
//!
//! This crate provides common types used across all Moto Shop components:
//! - `server` - HTTP backend that gates shop resources by role
//! - `cli` - Command-line tools for migrations and account seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and usernames, and the closed [`Role`] enum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
