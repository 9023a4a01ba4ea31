// Safescan — Vault Module
//
// Access to the privileged-access vault. The report pipeline depends only on
// the `VaultBackend` trait; `PacliBackend` implements it by driving the
// vendor's PACLI client, and `VaultSession` guarantees the session is
// released on every exit path.

pub mod backend;
mod error;
mod pacli;
mod session;

pub use backend::{ConnectParams, Session, VaultBackend};
pub use error::VaultError;
pub use pacli::PacliBackend;
pub use session::VaultSession;
