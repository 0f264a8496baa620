//! Record source: discovers a contact's exported CSV files and loads their rows.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::config::InputConfig;
use crate::error::{InsightsError, Result};
use crate::models::{Direction, RawMessage};

/// Loads every raw row belonging to a contact
pub trait RecordSource {
    /// Rows from all matching files, concatenated in file order
    fn load(&self, directory: &Path, contact_name: &str) -> Result<Vec<RawMessage>>;
}

/// Reads exported chat CSV files from a flat directory
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    input: InputConfig,
}

/// Header positions of the columns the pipeline reads
struct ColumnMap {
    chat_session: usize,
    direction: usize,
    text: usize,
    timestamp: usize,
}

impl CsvDirectorySource {
    /// Create a source using the configured extension and column names
    #[must_use]
    pub const fn new(input: InputConfig) -> Self {
        Self { input }
    }

    /// Files in `directory` whose name contains `contact_name` and ends with the extension.
    ///
    /// Names are sorted so that concatenation order is reproducible.
    pub fn matching_files(&self, directory: &Path, contact_name: &str) -> Result<Vec<PathBuf>> {
        let suffix = format!(".{}", self.input.file_extension);
        let mut files = Vec::new();

        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!(file = ?entry.path(), "Skipping file with non UTF-8 name");
                continue;
            };
            if name.ends_with(&suffix) && name.contains(contact_name) {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }

    fn column_map(&self, headers: &StringRecord, file: &Path) -> Result<ColumnMap> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| InsightsError::MissingColumn {
                    file: file.to_path_buf(),
                    column: column.to_string(),
                })
        };

        Ok(ColumnMap {
            chat_session: find(&self.input.chat_session_column)?,
            direction: find(&self.input.direction_column)?,
            text: find(&self.input.text_column)?,
            timestamp: find(&self.input.timestamp_column)?,
        })
    }

    /// Read one file into raw rows, preserving row order.
    pub fn read_file(&self, file: &Path) -> Result<Vec<RawMessage>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(file)?;
        let columns = self.column_map(reader.headers()?, file)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |index: usize| record.get(index).unwrap_or_default();

            let text = cell(columns.text);
            rows.push(RawMessage {
                chat_session: cell(columns.chat_session).to_string(),
                direction: Direction::parse(cell(columns.direction), &self.input.outgoing_label),
                text: (!text.is_empty()).then(|| text.to_string()),
                timestamp: cell(columns.timestamp).to_string(),
            });
        }

        debug!(file = %file.display(), rows = rows.len(), "Read conversation file");
        Ok(rows)
    }
}

impl RecordSource for CsvDirectorySource {
    fn load(&self, directory: &Path, contact_name: &str) -> Result<Vec<RawMessage>> {
        let files = self.matching_files(directory, contact_name)?;
        if files.is_empty() {
            return Err(InsightsError::NoMatchingFiles {
                contact: contact_name.to_string(),
                directory: directory.to_path_buf(),
            });
        }

        info!(files = files.len(), contact = contact_name, "Loading conversation files");
        let mut rows = Vec::new();
        for file in &files {
            rows.extend(self.read_file(file)?);
        }
        info!(rows = rows.len(), "Loaded conversation rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HEADER: &str = "Chat Session,Message Date,Type,Text\n";

    fn source() -> CsvDirectorySource {
        CsvDirectorySource::new(InputConfig::default())
    }

    #[test]
    fn test_matching_files_filters_name_and_extension() {
        let dir = tempdir().expect("tempdir");
        for name in ["Alex 1.csv", "Alex 2.csv", "Alex.txt", "Sam.csv"] {
            fs::write(dir.path().join(name), HEADER).expect("write");
        }
        fs::create_dir(dir.path().join("Alex.csv")).expect("mkdir");

        let files = source().matching_files(dir.path(), "Alex").expect("list");
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["Alex 1.csv", "Alex 2.csv"]);
    }

    #[test]
    fn test_load_concatenates_in_file_order() {
        let dir = tempdir().expect("tempdir");
        fs::write(
            dir.path().join("b-Alex.csv"),
            format!("{HEADER}Alex,2024-01-02 10:00:00,Incoming,second\n"),
        )
        .expect("write");
        fs::write(
            dir.path().join("a-Alex.csv"),
            format!("{HEADER}Alex,2024-01-01 10:00:00,Outgoing,first\nAlex,2024-01-01 11:00:00,Incoming,\n"),
        )
        .expect("write");

        let rows = source().load(dir.path(), "Alex").expect("load");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text.as_deref(), Some("first"));
        assert_eq!(rows[0].direction, Direction::Outgoing);
        assert_eq!(rows[1].text, None);
        assert_eq!(rows[2].text.as_deref(), Some("second"));
    }

    #[test]
    fn test_load_without_matches_fails() {
        let dir = tempdir().expect("tempdir");
        let err = source().load(dir.path(), "Nobody").expect_err("should fail");
        assert!(matches!(err, InsightsError::NoMatchingFiles { .. }));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("Alex.csv"), "Chat Session,Type\nAlex,Incoming\n").expect("write");
        let err = source().load(dir.path(), "Alex").expect_err("should fail");
        assert!(matches!(err, InsightsError::MissingColumn { ref column, .. } if column == "Text"));
    }
}
