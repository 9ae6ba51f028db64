//! Credential model: redacted token secrets and the persisted access/refresh pair.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;
