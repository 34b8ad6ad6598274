//! HTTP middleware stack for the shop backend.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Authorization happens in extractors, not layers: see [`auth`].

pub mod auth;
pub mod session;

pub use auth::{
    AccessRejection, RequireAdmin, RequireAdminOrManager, RequireAuth, clear_current_principal,
    set_current_principal,
};
pub use session::create_session_layer;
