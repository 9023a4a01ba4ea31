// Safescan — Checkpoint Store
//
// Persists an interrupted run so the next invocation resumes where it
// stopped. Two CSV files share the checkpoint's directory:
//
//   <name>.csv       records still to enrich (the resume work list)
//   <stem>.done.csv  records the interrupted run already enriched
//
// The work-list file decides whether a checkpoint exists. Each file is
// written to a `.tmp` sibling and renamed into place, the work list last.
// A save cut off between the two renames leaves a record in both files;
// load keeps the completed copy.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::record::{column_union, parse_processed, Record, FILE_NAME, PROCESSED};
use super::CheckpointError;

/// Summary of a checkpoint on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointStatus {
    pub pending: usize,
    pub completed: usize,
}

pub struct CheckpointStore {
    path: PathBuf,
    done_path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let done_path = done_path_for(&path);
        Self { path, done_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn done_path(&self) -> &Path {
        &self.done_path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the checkpointed records, completed ones first.
    /// Returns `None` when there is no checkpoint.
    pub fn load(&self) -> Result<Option<Vec<Record>>, CheckpointError> {
        if !self.exists() {
            return Ok(None);
        }

        let mut records = if self.done_path.exists() {
            read_records(&self.done_path)?
        } else {
            Vec::new()
        };
        let done: HashSet<String> = records.iter().map(|r| r.name.clone()).collect();
        let mut pending = read_records(&self.path)?;
        let before = pending.len();
        pending.retain(|r| !done.contains(&r.name));
        if pending.len() < before {
            tracing::warn!(
                dropped = before - pending.len(),
                "Work list repeats completed records; keeping the completed copies"
            );
        }

        tracing::info!(
            completed = records.len(),
            pending = pending.len(),
            "Loaded checkpoint from {}",
            self.path.display()
        );

        records.extend(pending);
        Ok(Some(records))
    }

    /// Overwrite the checkpoint with `records`. Unprocessed records form the
    /// work list; processed ones go to the completed file.
    pub fn save(&self, records: &[Record]) -> Result<(), CheckpointError> {
        let (completed, pending): (Vec<Record>, Vec<Record>) =
            records.iter().cloned().partition(|r| r.processed);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let done_tmp = tmp_path_for(&self.done_path);
        let work_tmp = tmp_path_for(&self.path);
        write_records(&done_tmp, &completed)?;
        write_records(&work_tmp, &pending)?;

        fs::rename(&done_tmp, &self.done_path)?;
        fs::rename(&work_tmp, &self.path)?;

        tracing::info!(
            completed = completed.len(),
            pending = pending.len(),
            "Checkpoint saved to {}",
            self.path.display()
        );
        Ok(())
    }

    /// Delete the checkpoint. Missing files are fine.
    pub fn clear(&self) -> Result<(), CheckpointError> {
        for path in [&self.path, &self.done_path] {
            match fs::remove_file(path) {
                Ok(()) => tracing::debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Record counts, or `None` when there is no checkpoint.
    pub fn status(&self) -> Result<Option<CheckpointStatus>, CheckpointError> {
        Ok(self.load()?.map(|records| {
            let completed = records.iter().filter(|r| r.processed).count();
            CheckpointStatus {
                pending: records.len() - completed,
                completed,
            }
        }))
    }
}

/// `dir/pending.checkpoint.csv` -> `dir/pending.checkpoint.done.csv`
fn done_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "checkpoint".to_string());
    path.with_file_name(format!("{}.done.csv", stem))
}

/// `pending.checkpoint.csv` -> `pending.checkpoint.csv.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_records(path: &Path, records: &[Record]) -> Result<(), CheckpointError> {
    let columns = column_union(records);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(
            columns
                .iter()
                .map(|column| record.field(column).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<Record>, CheckpointError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let name_index = headers
        .iter()
        .position(|h| h == FILE_NAME)
        .ok_or_else(|| CheckpointError::MissingColumn {
            path: path.display().to_string(),
            column: FILE_NAME.to_string(),
        })?;
    let processed_index = headers.iter().position(|h| h == PROCESSED);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let name = row.get(name_index).unwrap_or_default();
        let mut record = Record::new(name);

        for (index, (column, value)) in headers.iter().zip(row.iter()).enumerate() {
            if index == name_index || Some(index) == processed_index {
                continue;
            }
            record.set(column, value);
        }

        if let Some(index) = processed_index {
            let value = row.get(index).unwrap_or_default();
            record.processed =
                parse_processed(value).ok_or_else(|| CheckpointError::InvalidProcessed {
                    file: record.name.clone(),
                    value: value.to_string(),
                })?;
        }

        records.push(record);
    }
    Ok(records)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(name: &str, attrs: &[(&str, &str)]) -> Record {
        let mut record = Record::new(name);
        record.merge(attrs.iter().copied());
        record.processed = true;
        record
    }

    fn store_in(dir: &tempfile::TempDir) -> CheckpointStore {
        CheckpointStore::new(dir.path().join("pending.checkpoint.csv"))
    }

    #[test]
    fn test_load_without_checkpoint_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_none());
        assert!(store.status().unwrap().is_none());
    }

    #[test]
    fn test_done_path_sits_next_to_checkpoint() {
        let store = CheckpointStore::new("/tmp/x/pending.checkpoint.csv");
        assert_eq!(
            store.done_path(),
            Path::new("/tmp/x/pending.checkpoint.done.csv")
        );
    }

    #[test]
    fn test_save_splits_work_list_from_completed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let records = vec![
            enriched("svcA", &[("UserName", "admin")]),
            Record::new("svcB"),
            Record::new("svcC"),
        ];
        store.save(&records).unwrap();

        let work_list = read_records(store.path()).unwrap();
        let names: Vec<&str> = work_list.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["svcB", "svcC"], "work list holds only unprocessed records");
        assert!(work_list.iter().all(|r| !r.processed));

        let done = read_records(store.done_path()).unwrap();
        assert_eq!(done, vec![records[0].clone()]);
    }

    #[test]
    fn test_load_returns_completed_then_pending() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let records = vec![
            enriched("a", &[("UserName", "u1"), ("Address", "h1")]),
            enriched("b", &[("Address", "h2"), ("Dependencies", "db1,db2")]),
            Record::new("c"),
        ];
        store.save(&records).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, records);
        assert_eq!(
            store.status().unwrap(),
            Some(CheckpointStatus { pending: 1, completed: 2 })
        );
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut partial = Record::new("svc \"quoted\", name");
        partial.set("Notes", "line1\nline2");
        let records = vec![
            enriched("a", &[("A", "1"), ("B", "2")]),
            enriched("b", &[("B", "3"), ("C", "4")]),
            partial,
        ];
        store.save(&records).unwrap();
        let first_pending = fs::read(store.path()).unwrap();
        let first_done = fs::read(store.done_path()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        store.save(&loaded).unwrap();

        assert_eq!(fs::read(store.path()).unwrap(), first_pending);
        assert_eq!(fs::read(store.done_path()).unwrap(), first_done);
    }

    #[test]
    fn test_half_applied_save_does_not_duplicate_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut records = vec![
            enriched("A", &[("UserName", "u1")]),
            Record::new("B"),
            Record::new("C"),
            Record::new("D"),
        ];
        store.save(&records).unwrap();

        // The next save got as far as the completed file only.
        records[1] = enriched("B", &[("UserName", "u2")]);
        write_records(store.done_path(), &records[..2]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        let names: Vec<(&str, bool)> = loaded.iter().map(|r| (r.name.as_str(), r.processed)).collect();
        assert_eq!(
            names,
            vec![("A", true), ("B", true), ("C", false), ("D", false)]
        );
        assert_eq!(
            store.status().unwrap(),
            Some(CheckpointStatus { pending: 2, completed: 2 })
        );
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[enriched("a", &[]), Record::new("b")]).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["pending.checkpoint.csv", "pending.checkpoint.done.csv"]);
    }

    #[test]
    fn test_clear_removes_both_files_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&[enriched("a", &[]), Record::new("b")]).unwrap();
        assert!(store.path().exists());
        assert!(store.done_path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(!store.done_path().exists());

        // Clearing again is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn test_missing_file_name_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "Name,Processed\nsvcA,False\n").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, CheckpointError::MissingColumn { .. }));
    }

    #[test]
    fn test_invalid_processed_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "FileName,Processed\nsvcA,perhaps\n").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, CheckpointError::InvalidProcessed { .. }));
    }

    #[test]
    fn test_checkpoint_without_processed_column_loads_as_unprocessed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "FileName,UserName\nsvcA,admin\n").unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded[0].processed);
        assert_eq!(loaded[0].get("UserName"), Some("admin"));
    }
}
