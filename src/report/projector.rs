// Safescan — Column projection
//
// Turns the sparse record set into a dense table. Runs after enrichment and
// dependency linking, so deny-listed fields such as `MasterPassName` stay
// available to the earlier stages and are only stripped here.

use indexmap::IndexSet;

use super::record::{column_union, Record};

/// A dense, ordered table ready for a `Reporter`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Column ordering and deny-list for the final report.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    first_columns: Vec<String>,
    exclude_columns: Vec<String>,
}

impl Projection {
    pub fn new(first_columns: Vec<String>, exclude_columns: Vec<String>) -> Self {
        Self {
            first_columns,
            exclude_columns,
        }
    }

    /// Output columns: `first_columns` deduplicated and in order, then every
    /// other field in first-seen order, minus the deny-list.
    pub fn columns(&self, records: &[Record]) -> Vec<String> {
        let mut columns: IndexSet<String> = self.first_columns.iter().cloned().collect();
        columns.extend(column_union(records));
        columns.retain(|c| !self.exclude_columns.contains(c));
        columns.into_iter().collect()
    }

    pub fn project(&self, records: &[Record]) -> Table {
        let columns = self.columns(records);
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.field(column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        Table { columns, rows }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
