// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Append-only order and delivery logs.
//!
//! Each kind of record has its own flat file with one record per line:
//!
//! ```text
//! Bread,20
//! Cookies,12
//! ```
//!
//! The legacy line carries no ID. On replay a record without an explicit ID
//! is identified by its 1-based position in the file, which is how the
//! allocator is reseeded after a restart. Logs written with
//! [`LogFormat::Identified`] prefix every line with its ID instead
//! (`3,Bread,20`). Replay understands both shapes, even mixed in one file.

use crate::InventoryError;
use crate::base::RecordId;
use crate::transaction::RecordKind;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Line layout used when appending records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `<name>,<quantity>`, compatible with existing data files.
    #[default]
    Legacy,
    /// `<id>,<name>,<quantity>`.
    Identified,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(LogFormat::Legacy),
            "identified" => Ok(LogFormat::Identified),
            other => Err(format!(
                "unknown log format '{other}' (expected 'legacy' or 'identified')"
            )),
        }
    }
}

/// A record recovered from a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: RecordId,
    pub item_name: String,
    pub quantity: u32,
}

/// Append-only log of one [`RecordKind`].
#[derive(Debug, Clone)]
pub struct TransactionLog {
    path: PathBuf,
    kind: RecordKind,
    format: LogFormat,
    /// Records in the file, malformed ones included.
    lines: u32,
}

/// Everything a scan of the log file yields.
struct Scan {
    entries: Vec<LogEntry>,
    lines: u32,
}

impl TransactionLog {
    /// Opens the log at `path`, counting the records already in it.
    ///
    /// A missing file is an empty log and is created on the first append.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Persistence`] if the file exists but cannot
    /// be read.
    pub fn open(
        path: impl Into<PathBuf>,
        kind: RecordKind,
        format: LogFormat,
    ) -> Result<Self, InventoryError> {
        let mut log = Self {
            path: path.into(),
            kind,
            format,
            lines: 0,
        };
        log.lines = log.scan()?.lines;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Number of records in the file, malformed ones included.
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Appends one record, creating the file if needed.
    ///
    /// In [`LogFormat::Legacy`] a record whose ID differs from its line
    /// position is written with its ID, otherwise a replay would give it a
    /// different one. The file is flushed and closed before returning, on
    /// success and on error alike.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Persistence`] if the file cannot be opened
    /// or written.
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), InventoryError> {
        let position = self.lines.saturating_add(1);
        let identified = self.format == LogFormat::Identified || entry.id.0 != position;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| InventoryError::persistence(&self.path, e))?;

        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        let quantity = entry.quantity.to_string();
        let result = if identified {
            let id = entry.id.to_string();
            wtr.write_record([id.as_str(), entry.item_name.as_str(), quantity.as_str()])
        } else {
            wtr.write_record([entry.item_name.as_str(), quantity.as_str()])
        };
        result.map_err(|e| InventoryError::persistence(&self.path, e))?;
        wtr.flush()
            .map_err(|e| InventoryError::persistence(&self.path, e))?;

        self.lines = position;
        debug!(kind = %self.kind, id = %entry.id, identified, "appended log record");
        Ok(())
    }

    /// Reads every well-formed record in file order.
    ///
    /// A missing file is an empty log. Malformed lines are skipped with a
    /// warning but still count towards the line position of later records.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Persistence`] if the file exists but cannot
    /// be read.
    pub fn replay(&self) -> Result<Vec<LogEntry>, InventoryError> {
        Ok(self.scan()?.entries)
    }

    /// Highest ID the log accounts for, or `RecordId(0)` for an empty log.
    ///
    /// This is the larger of the highest explicit ID and the number of
    /// records, so a trailing malformed line still reserves its position.
    pub fn highest_id(&self) -> Result<RecordId, InventoryError> {
        let scan = self.scan()?;
        let explicit = scan.entries.iter().map(|entry| entry.id.0).max().unwrap_or(0);
        Ok(RecordId(explicit.max(scan.lines)))
    }

    fn scan(&self) -> Result<Scan, InventoryError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Scan {
                    entries: Vec::new(),
                    lines: 0,
                });
            }
            Err(e) => return Err(InventoryError::persistence(&self.path, e)),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut entries = Vec::new();
        let mut lines = 0u32;
        for result in rdr.records() {
            lines = lines.saturating_add(1);
            let position = RecordId(lines);
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    return Err(InventoryError::persistence(&self.path, e));
                }
                Err(e) => {
                    warn!(path = %self.path.display(), line = position.0, "skipping unreadable log line: {e}");
                    continue;
                }
            };
            match parse_entry(&record, position) {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(path = %self.path.display(), line = position.0, "skipping malformed log line: {record:?}");
                }
            }
        }
        Ok(Scan { entries, lines })
    }
}

/// Parses `name,quantity` or `id,name,quantity`.
fn parse_entry(record: &StringRecord, position: RecordId) -> Option<LogEntry> {
    let (id, name, quantity) = match record.len() {
        2 => (position, &record[0], &record[1]),
        3 => {
            let id = record[0].parse::<u32>().ok().filter(|id| *id > 0)?;
            (RecordId(id), &record[1], &record[2])
        }
        _ => return None,
    };
    if name.is_empty() {
        return None;
    }
    let quantity = quantity.parse::<u32>().ok().filter(|q| *q > 0)?;
    Some(LogEntry {
        id,
        item_name: name.to_string(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(id: u32, name: &str, quantity: u32) -> LogEntry {
        LogEntry {
            id: RecordId(id),
            item_name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn legacy_append_writes_name_and_quantity() {
        let dir = TempDir::new().unwrap();
        let mut log = TransactionLog::open(
            dir.path().join("deliveries.txt"),
            RecordKind::Delivery,
            LogFormat::Legacy,
        )
        .unwrap();
        log.append(&entry(1, "Bread", 20)).unwrap();
        log.append(&entry(2, "Cake", 3)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "Bread,20\nCake,3\n");
    }

    #[test]
    fn identified_append_writes_id_first() {
        let dir = TempDir::new().unwrap();
        let mut log = TransactionLog::open(
            dir.path().join("orders.txt"),
            RecordKind::Order,
            LogFormat::Identified,
        )
        .unwrap();
        log.append(&entry(7, "Donut", 4)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "7,Donut,4\n");
    }

    #[test]
    fn replay_of_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = TransactionLog::open(
            dir.path().join("absent.txt"),
            RecordKind::Order,
            LogFormat::Legacy,
        )
        .unwrap();
        assert!(log.replay().unwrap().is_empty());
        assert_eq!(log.highest_id().unwrap(), RecordId(0));
    }

    #[test]
    fn replay_numbers_legacy_lines_by_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.txt");
        fs::write(&path, "Bread,15\nCake,2\nDonut,9\n").unwrap();
        let log = TransactionLog::open(&path, RecordKind::Order, LogFormat::Legacy).unwrap();

        let entries = log.replay().unwrap();
        assert_eq!(
            entries,
            vec![entry(1, "Bread", 15), entry(2, "Cake", 2), entry(3, "Donut", 9)]
        );
        assert_eq!(log.highest_id().unwrap(), RecordId(3));
    }

    #[test]
    fn replay_skips_malformed_lines_but_keeps_positions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.txt");
        fs::write(&path, "Bread,15\nnot a record\nCake,zero\nDonut,9\n").unwrap();
        let log = TransactionLog::open(&path, RecordKind::Order, LogFormat::Legacy).unwrap();

        let entries = log.replay().unwrap();
        assert_eq!(entries, vec![entry(1, "Bread", 15), entry(4, "Donut", 9)]);
    }

    #[test]
    fn replay_accepts_mixed_shapes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deliveries.txt");
        fs::write(&path, "Bread,1\n12,Cake,2\nDanish,3\n").unwrap();
        let log = TransactionLog::open(&path, RecordKind::Delivery, LogFormat::Legacy).unwrap();

        let entries = log.replay().unwrap();
        assert_eq!(
            entries,
            vec![entry(1, "Bread", 1), entry(12, "Cake", 2), entry(3, "Danish", 3)]
        );
        assert_eq!(log.highest_id().unwrap(), RecordId(12));
    }

    #[test]
    fn replay_rejects_zero_quantity_and_zero_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.txt");
        fs::write(&path, "Bread,0\n0,Cake,2\n").unwrap();
        let log = TransactionLog::open(&path, RecordKind::Order, LogFormat::Legacy).unwrap();

        assert!(log.replay().unwrap().is_empty());
    }

    #[test]
    fn legacy_append_writes_id_when_ahead_of_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deliveries.txt");
        fs::write(&path, "Bread,1\n12,Cake,2\nDanish,3\n").unwrap();
        let mut log = TransactionLog::open(&path, RecordKind::Delivery, LogFormat::Legacy).unwrap();
        assert_eq!(log.lines(), 3);

        log.append(&entry(13, "Bread", 4)).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("Danish,3\n13,Bread,4\n"));
        assert_eq!(log.lines(), 4);
        assert_eq!(log.highest_id().unwrap(), RecordId(13));
    }

    #[test]
    fn highest_id_counts_trailing_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deliveries.txt");
        fs::write(&path, "Bread,1\ngarbage\n").unwrap();
        let log = TransactionLog::open(&path, RecordKind::Delivery, LogFormat::Legacy).unwrap();

        assert_eq!(log.lines(), 2);
        assert_eq!(log.replay().unwrap(), vec![entry(1, "Bread", 1)]);
        assert_eq!(log.highest_id().unwrap(), RecordId(2));
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("Legacy".parse::<LogFormat>(), Ok(LogFormat::Legacy));
        assert_eq!("IDENTIFIED".parse::<LogFormat>(), Ok(LogFormat::Identified));
        assert!("json".parse::<LogFormat>().is_err());
    }
}
