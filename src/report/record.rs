// Safescan — Record model
//
// One pending account. Attributes are an open, insertion-ordered bag: each
// file in the pending safe carries its own set of categories, so the column
// universe is only known once every record has been enriched.

use indexmap::IndexMap;

/// Column holding the record identifier.
pub const FILE_NAME: &str = "FileName";

/// Column holding the resume flag.
pub const PROCESSED: &str = "Processed";

/// Category naming the master credential of a dependent account.
pub const MASTER_PASS_NAME: &str = "MasterPassName";

/// A pending account and the metadata gathered for it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    attributes: IndexMap<String, String>,
    /// Set once enrichment completed for this record. Resume bookkeeping only.
    pub processed: bool,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            processed: false,
        }
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set an attribute, last write wins.
    ///
    /// An empty value removes the attribute: a missing attribute and an empty
    /// sparse cell must mean the same thing after a checkpoint round-trip.
    /// The `FileName` and `Processed` columns are reserved and never shadowed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if key == FILE_NAME || key == PROCESSED {
            tracing::debug!(file = %self.name, key = %key, "Ignoring reserved attribute name");
            return;
        }
        if value.is_empty() {
            self.attributes.shift_remove(&key);
            return;
        }
        self.attributes.insert(key, value);
    }

    /// Merge a batch of fetched attributes.
    pub fn merge<I, K, V>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in attributes {
            self.set(key, value);
        }
    }

    /// Name of this record's master credential, if it is a dependent.
    pub fn master_pass_name(&self) -> Option<&str> {
        self.get(MASTER_PASS_NAME)
    }

    /// Value of a projectable field: the identifier, an attribute, or the
    /// resume flag.
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            FILE_NAME => Some(&self.name),
            PROCESSED => Some(if self.processed { "True" } else { "False" }),
            other => self.get(other),
        }
    }
}

/// Every field name across `records`: `FileName`, then attribute keys in
/// first-seen order, then `Processed`.
pub fn column_union(records: &[Record]) -> Vec<String> {
    let mut columns = indexmap::IndexSet::new();
    columns.insert(FILE_NAME.to_string());
    for record in records {
        for key in record.attributes.keys() {
            if !columns.contains(key) {
                columns.insert(key.clone());
            }
        }
    }
    columns.insert(PROCESSED.to_string());
    columns.into_iter().collect()
}

/// Parse a `Processed` cell. Accepts any casing of true/false.
pub fn parse_processed(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" | "" => Some(false),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
