//! Authorization for shop resources.
//!
//! - [`SecurityContext`] - the identity attached to the current request
//! - [`RoleChecker`] - role resolution and owner-or-privileged access checks
//!
//! How an identity is established (sign-in) is not handled here; this
//! module only reads what the session already holds.

pub mod context;
pub mod role_checker;

pub use context::SecurityContext;
pub use role_checker::RoleChecker;
