// Safescan — Report Module
//
// The record model and everything that turns records into files: the
// resume checkpoint, the column projection, and the report writers.

mod checkpoint;
mod error;
mod projector;
mod record;
mod reporter;

pub use checkpoint::{CheckpointStatus, CheckpointStore};
pub use error::{CheckpointError, ReportError};
pub use projector::{Projection, Table};
pub use record::{column_union, Record, FILE_NAME, MASTER_PASS_NAME, PROCESSED};
pub use reporter::{file_reporter, CsvReporter, JsonReporter, OutputFormat, Reporter};
