// Safescan — Pipeline runner
//
// One report run:
//   open session -> load checkpoint, or enumerate the safe
//   -> enrich (on failure: save checkpoint, stop) -> link dependencies
//   -> clear checkpoint -> close session -> project -> emit

use crate::config::Config;
use crate::error::{Result, SafescanError};
use crate::report::{CheckpointStore, Reporter};
use crate::vault::{VaultBackend, VaultSession};

use super::enricher::{enrich, link_dependencies};
use super::enumerator::enumerate;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Records in the report.
    pub total: usize,
    /// Records enriched during this invocation.
    pub enriched: usize,
    /// True when the run continued from a checkpoint.
    pub resumed: bool,
    /// Dependents that found their master.
    pub linked: usize,
    pub destination: String,
}

pub fn run<B: VaultBackend + ?Sized>(
    backend: &B,
    config: &Config,
    reporter: &dyn Reporter,
) -> Result<RunSummary> {
    let store = CheckpointStore::new(&config.checkpoint_path);
    let session = VaultSession::open(backend, &config.connect_params())?;

    let (mut records, resumed) = match store.load()? {
        Some(records) => {
            tracing::info!("Resuming from checkpoint {}", store.path().display());
            (records, true)
        }
        None => (enumerate(&session, &config.safe, &config.folder)?, false),
    };

    let outcome = enrich(&session, &config.safe, &config.folder, &mut records);

    if let Some(failure) = outcome.failure {
        if let Err(save_error) = store.save(&records) {
            tracing::error!(
                file = %failure.file,
                "Enrichment failed ({}) and the checkpoint could not be saved",
                failure.error
            );
            return Err(save_error.into());
        }
        tracing::warn!(
            "Progress saved to {}; run again to resume",
            store.path().display()
        );
        return Err(SafescanError::Enrichment {
            file: failure.file,
            source: failure.error,
        });
    }

    let linked = link_dependencies(&mut records, &config.dependency_attributes);
    store.clear()?;
    session.close();

    let table = config.projection().project(&records);
    reporter.emit(&table)?;
    tracing::info!(rows = table.rows.len(), "Report written to {}", reporter.destination());

    Ok(RunSummary {
        total: records.len(),
        enriched: outcome.enriched,
        resumed,
        linked,
        destination: reporter.destination(),
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
