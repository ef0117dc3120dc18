//! Domain models for the storefront.

pub mod session;
pub mod user;

pub use session::{CurrentUser, StoreSession, session_keys};
pub use user::Account;
