// Safescan — Enricher and Dependency Linker
//
// Enrichment walks the unprocessed records in order and stops at the first
// failure; each step is its own `Result`, so the caller knows exactly which
// records are done. A record's categories are fetched in full before any of
// them is merged, and `processed` is set only after the merge.
//
// Linking runs once every record is enriched: dependents copy allow-listed
// attributes from their master, which is left untouched.

use std::collections::HashMap;

use crate::report::Record;
use crate::vault::{VaultBackend, VaultError, VaultSession};

/// The record enrichment stopped at.
#[derive(Debug)]
pub struct EnrichFailure {
    pub file: String,
    pub error: VaultError,
}

#[derive(Debug, Default)]
pub struct EnrichOutcome {
    /// Records enriched by this call.
    pub enriched: usize,
    /// Records already processed before this call.
    pub skipped: usize,
    pub failure: Option<EnrichFailure>,
}

fn enrich_one<B: VaultBackend + ?Sized>(
    session: &VaultSession<'_, B>,
    safe: &str,
    folder: &str,
    record: &mut Record,
) -> Result<(), VaultError> {
    let categories =
        session
            .backend()
            .file_categories(session.handle(), safe, folder, &record.name)?;
    tracing::debug!(file = %record.name, categories = categories.len(), "Fetched categories");

    record.merge(categories);
    record.processed = true;
    Ok(())
}

/// Enrich every unprocessed record, halting at the first error.
pub fn enrich<B: VaultBackend + ?Sized>(
    session: &VaultSession<'_, B>,
    safe: &str,
    folder: &str,
    records: &mut [Record],
) -> EnrichOutcome {
    let mut outcome = EnrichOutcome::default();

    for record in records.iter_mut() {
        if record.processed {
            outcome.skipped += 1;
            continue;
        }

        match enrich_one(session, safe, folder, record) {
            Ok(()) => outcome.enriched += 1,
            Err(error) => {
                tracing::error!(file = %record.name, "Enrichment failed: {}", error);
                outcome.failure = Some(EnrichFailure {
                    file: record.name.clone(),
                    error,
                });
                break;
            }
        }
    }

    tracing::info!(
        enriched = outcome.enriched,
        skipped = outcome.skipped,
        failed = outcome.failure.is_some(),
        "Enrichment pass finished"
    );
    outcome
}

/// Copy allow-listed attributes from each dependent's master into the
/// dependent. Values are taken from the records as they were before linking
/// began, so the result does not depend on record order. Returns the number
/// of dependents that found their master.
pub fn link_dependencies(records: &mut [Record], allow_list: &[String]) -> usize {
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        by_name.entry(record.name.as_str()).or_insert(index);
    }

    let mut copies: Vec<(usize, Vec<(String, String)>)> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let Some(master_name) = record.master_pass_name() else {
            continue;
        };
        let Some(&master_index) = by_name.get(master_name) else {
            tracing::debug!(file = %record.name, master = %master_name, "Master not in safe");
            continue;
        };
        if master_index == index {
            continue;
        }

        let master = &records[master_index];
        let inherited = allow_list
            .iter()
            .filter_map(|key| master.get(key).map(|value| (key.clone(), value.to_string())))
            .collect();
        copies.push((index, inherited));
    }

    let linked = copies.len();
    for (index, inherited) in copies {
        records[index].merge(inherited);
    }

    tracing::info!(linked, "Linked dependent accounts to their masters");
    linked
}

// ─── Tests ───────────────────────────────────────────────────────────────────
