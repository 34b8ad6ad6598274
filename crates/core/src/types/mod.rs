//! Core types for Moto Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod role;
pub mod username;

pub use id::*;
pub use role::{Role, RoleParseError};
pub use username::{Username, UsernameError};
