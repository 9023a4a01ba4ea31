// Safescan — Session Manager
//
// Owns the vault session for the lifetime of a run. The session is released
// exactly once: explicitly through `close()` on the success path, or from
// `Drop` when a run bails out early. Release failures are logged, never
// returned.

use super::backend::{ConnectParams, Session, VaultBackend};
use super::VaultError;

/// An open vault session bound to the backend that created it.
pub struct VaultSession<'a, B: VaultBackend + ?Sized> {
    backend: &'a B,
    session: Session,
    released: bool,
}

impl<'a, B: VaultBackend + ?Sized> VaultSession<'a, B> {
    /// Connect to the vault. Any failure here is a `VaultError::Connection`.
    pub fn open(backend: &'a B, params: &ConnectParams) -> Result<Self, VaultError> {
        if params.auto_change_password {
            tracing::warn!(
                "Auto password change is enabled; the logon file {} will be rotated on logon",
                params.logon_file.display()
            );
        }

        let session = backend.connect(params).map_err(|e| match e {
            VaultError::Connection(msg) => VaultError::Connection(msg),
            other => VaultError::Connection(other.to_string()),
        })?;

        tracing::info!(
            vault = %session.vault,
            user = %session.user,
            safe = %session.safe,
            "Connected to vault"
        );

        Ok(Self {
            backend,
            session,
            released: false,
        })
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    /// The live session handle.
    pub fn handle(&self) -> &Session {
        &self.session
    }

    /// Release the session. Best-effort.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let vault = &self.session.vault;
        match self.backend.disconnect(&self.session) {
            Ok(()) => tracing::info!(vault = %vault, "Disconnected from vault"),
            Err(e) => tracing::warn!(vault = %vault, "Disconnect failed: {}", e),
        }
    }
}

impl<B: VaultBackend + ?Sized> Drop for VaultSession<'_, B> {
    fn drop(&mut self) {
        self.release();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
