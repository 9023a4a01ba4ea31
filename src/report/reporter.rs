// Safescan — Report sinks
//
// The reporter is the one user-replaceable stage: anything that accepts the
// projected table can stand in for the file writers here.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::projector::Table;
use super::ReportError;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Destination for the finished report.
pub trait Reporter {
    fn emit(&self, table: &Table) -> Result<(), ReportError>;

    /// Where the report goes, for operator messages.
    fn destination(&self) -> String;
}

/// Build the file reporter for `format`.
pub fn file_reporter(format: OutputFormat, path: impl Into<PathBuf>) -> Box<dyn Reporter> {
    let path = path.into();
    match format {
        OutputFormat::Csv => Box::new(CsvReporter::new(path)),
        OutputFormat::Json => Box::new(JsonReporter::new(path)),
    }
}

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

pub struct CsvReporter {
    path: PathBuf,
}

impl CsvReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for CsvReporter {
    fn emit(&self, table: &Table) -> Result<(), ReportError> {
        ensure_parent(&self.path)?;
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

// ─── JSON ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    columns: &'a [String],
    rows: Vec<IndexMap<&'a str, &'a str>>,
}

pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for JsonReporter {
    fn emit(&self, table: &Table) -> Result<(), ReportError> {
        ensure_parent(&self.path)?;

        let rows = table
            .rows
            .iter()
            .map(|row| {
                table
                    .columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect::<IndexMap<_, _>>()
            })
            .collect();
        let report = JsonReport {
            generated_at: Utc::now(),
            columns: &table.columns,
            rows,
        };

        let mut writer = BufWriter::new(fs::File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer.flush()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            columns: vec!["FileName".to_string(), "UserName".to_string()],
            rows: vec![
                vec!["svcA".to_string(), "admin".to_string()],
                vec!["svcB".to_string(), "".to_string()],
            ],
        }
    }

    #[test]
    fn test_csv_reporter_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.csv");

        CsvReporter::new(&path).emit(&table()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "FileName,UserName\nsvcA,admin\nsvcB,\n");
    }

    #[test]
    fn test_json_reporter_keeps_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        file_reporter(OutputFormat::Json, &path).emit(&table()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["columns"], serde_json::json!(["FileName", "UserName"]));
        assert_eq!(value["rows"][0]["UserName"], "admin");
        assert_eq!(value["rows"][1]["FileName"], "svcB");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_output_format_parses_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }
}
