// Safescan — Enumerator
//
// Lists the pending safe once per data set. Files ending in `.txt` belong to
// the vault's password rotation component and are not accounts.

use crate::report::Record;
use crate::vault::{VaultBackend, VaultError, VaultSession};

/// Internal rotation files are skipped.
pub fn is_internal_file(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".txt")
}

/// One fresh `Record` per account file in `folder` of `safe`.
pub fn enumerate<B: VaultBackend + ?Sized>(
    session: &VaultSession<'_, B>,
    safe: &str,
    folder: &str,
) -> Result<Vec<Record>, VaultError> {
    let files = session.backend().list_files(session.handle(), safe, folder)?;
    let listed = files.len();

    let records: Vec<Record> = files
        .into_iter()
        .filter(|name| !is_internal_file(name))
        .map(Record::new)
        .collect();

    tracing::info!(
        listed,
        accounts = records.len(),
        "Enumerated pending safe {}",
        safe
    );
    Ok(records)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::backend::mock::{params, MockVault};

    #[test]
    fn test_internal_file_pattern() {
        assert!(is_internal_file("CPMState.txt"));
        assert!(is_internal_file("notes.TXT"));
        assert!(!is_internal_file("Operating System-WinDomain-host-admin"));
        assert!(!is_internal_file("txt"));
    }

    #[test]
    fn test_enumerate_filters_internal_files() {
        let vault = MockVault::new()
            .with_file("svcA", &[])
            .with_file("svcA.txt", &[])
            .with_file("svcB", &[])
            .with_file("rotation.TXT", &[]);
        let session = VaultSession::open(&vault, &params()).unwrap();

        let records = enumerate(&session, "PasswordManager_Pending", "Root").unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["svcA", "svcB"]);
        assert!(records.iter().all(|r| !r.processed && r.attributes().is_empty()));
    }

    #[test]
    fn test_enumerate_empty_safe() {
        let vault = MockVault::new();
        let session = VaultSession::open(&vault, &params()).unwrap();
        assert!(enumerate(&session, "PasswordManager_Pending", "Root")
            .unwrap()
            .is_empty());
    }
}
