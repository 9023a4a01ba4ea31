// Safescan — Pipeline Module
//
// The report run: enumerate the pending safe, enrich each account with its
// categories, link dependents to their masters, and hand the projected
// table to a reporter. Progress survives failures through the checkpoint.

mod enricher;
mod enumerator;
mod runner;

pub use enricher::{enrich, link_dependencies, EnrichFailure, EnrichOutcome};
pub use enumerator::{enumerate, is_internal_file};
pub use runner::{run, RunSummary};
