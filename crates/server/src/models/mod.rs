//! Domain models for the shop backend.

pub mod account;
pub mod session;

pub use account::{Account, AccountView};
pub use session::{Principal, keys as session_keys};
