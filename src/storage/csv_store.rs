//! CSV storage implementation
//!
//! Records are appended one row per listing to a single CSV file whose header
//! is [`RECORD_COLUMNS`]. Every append is flushed before returning, so a killed
//! process loses at most the row being written. That partial row is detected
//! and cut off the next time the file is opened.

use crate::extract::{EnrichedRecord, RECORD_COLUMNS};
use crate::storage::traits::{ensure_ids, RecordStore, StorageError, StorageResult};
use csv::{ReaderBuilder, Writer};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const BOM: &str = "\u{feff}";

/// Append-only CSV backend
pub struct CsvStorage {
    path: PathBuf,
    writer: Writer<File>,
}

impl CsvStorage {
    /// Opens (or creates) the CSV store at `path`
    ///
    /// A trailing partial row left by an interrupted write is truncated. A new
    /// or empty file gets a UTF-8 BOM followed by the header.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let existed = path.exists();
        if existed {
            repair_tail(path)?;
            check_header(path)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;
        if is_empty {
            // Spreadsheet tools need the BOM to read the file as UTF-8
            file.write_all(BOM.as_bytes())?;
        }
        let mut writer = Writer::from_writer(file);

        if is_empty {
            writer.write_record(RECORD_COLUMNS)?;
            writer.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    fn reader(&self) -> StorageResult<csv::Reader<File>> {
        Ok(ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?)
    }
}

impl RecordStore for CsvStorage {
    fn load_ids(&self) -> StorageResult<HashSet<String>> {
        let mut ids = HashSet::new();
        for row in self.reader()?.records() {
            let row = row?;
            if let Some(id) = row.get(0).map(str::trim).filter(|id| !id.is_empty()) {
                ids.insert(id.to_string());
            }
        }
        Ok(ids)
    }

    fn count_records(&self) -> StorageResult<u64> {
        count_rows(&self.path)
    }

    fn append(&mut self, records: &[EnrichedRecord]) -> StorageResult<()> {
        ensure_ids(records)?;

        for record in records {
            self.writer.write_record(record.to_row())?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Counts complete rows in a CSV store without opening it for writing
///
/// A row left short by an interrupted write is not counted.
pub(crate) fn count_rows(path: &Path) -> StorageResult<u64> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut count = 0;
    for row in reader.records() {
        if row?.len() == RECORD_COLUMNS.len() {
            count += 1;
        }
    }
    Ok(count)
}

/// Cuts off a final row that was not completely written
///
/// The writer always terminates a row with a newline, so a file that does not
/// end in one, or whose last row has the wrong number of fields, was
/// interrupted mid-row.
fn repair_tail(path: &Path) -> StorageResult<()> {
    let mut content = Vec::new();
    File::open(path)?.read_to_end(&mut content)?;
    if content.is_empty() {
        return Ok(());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_slice());

    let mut last_start = 0u64;
    let mut last_len = 0usize;
    let mut record = csv::ByteRecord::new();
    loop {
        let start = reader.position().byte();
        if !reader.read_byte_record(&mut record)? {
            break;
        }
        last_start = start;
        last_len = record.len();
    }

    let ends_cleanly = content.last() == Some(&b'\n');
    if ends_cleanly && last_len == RECORD_COLUMNS.len() {
        return Ok(());
    }

    tracing::warn!(
        "Truncating incomplete trailing row in {} at byte {}",
        path.display(),
        last_start
    );
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(last_start)?;
    file.sync_all()?;
    Ok(())
}

/// Refuses to append to a CSV file written with a different column layout
fn check_header(path: &Path) -> StorageResult<()> {
    let mut reader = ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut header = csv::StringRecord::new();
    if !reader.read_record(&mut header)? {
        return Ok(());
    }

    let columns: Vec<&str> = header
        .iter()
        .enumerate()
        .map(|(i, c)| if i == 0 { c.trim_start_matches(BOM) } else { c })
        .collect();

    if columns != RECORD_COLUMNS {
        return Err(StorageError::SchemaMismatch(format!(
            "{} has columns [{}], expected [{}]",
            path.display(),
            columns.join(", "),
            RECORD_COLUMNS.join(", ")
        )));
    }

    Ok(())
}
