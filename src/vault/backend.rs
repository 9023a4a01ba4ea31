// Safescan — Vault backend abstraction
//
// The pipeline talks to the vault only through `VaultBackend`. The production
// implementation shells out to PACLI; tests use the in-memory mock below.

use super::VaultError;

// ─── Types ───────────────────────────────────────────────────────────────────

/// Everything needed to open a session against a vault.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub vault_name: String,
    pub address: String,
    pub port: u16,
    pub username: String,
    /// Path to the logon (credential) file. Its contents are never read here.
    pub logon_file: std::path::PathBuf,
    pub accept_self_signed: bool,
    /// When true the vault rotates the secret in `logon_file` on logon.
    pub auto_change_password: bool,
    /// Safe opened as part of the logon.
    pub safe: String,
}

/// An open session handle, owned by the session manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub vault: String,
    pub user: String,
    pub safe: String,
    pub id: u32,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The four vault operations the report needs.
pub trait VaultBackend {
    /// Define the vault, log on, and open the safe.
    fn connect(&self, params: &ConnectParams) -> Result<Session, VaultError>;

    /// Close the safe, log off, and release client resources.
    fn disconnect(&self, session: &Session) -> Result<(), VaultError>;

    /// File names in `folder` of `safe`.
    fn list_files(&self, session: &Session, safe: &str, folder: &str)
        -> Result<Vec<String>, VaultError>;

    /// All (category name, category value) pairs attached to one file.
    fn file_categories(
        &self,
        session: &Session,
        safe: &str,
        folder: &str,
        file: &str,
    ) -> Result<Vec<(String, String)>, VaultError>;
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────
