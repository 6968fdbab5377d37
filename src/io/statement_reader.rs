//! Statement CSV reader with iterator interface
//!
//! Reads a statement in the export format back into display transactions.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The StatementReader uses csv::Reader to deserialize rows one at a time,
//! delegating conversion to the csv_format module. Rows are numbered by
//! position, the same way a statement fetched from the API is numbered.
//!
//! ```no_run
//! use rust_portal_engine::io::statement_reader::StatementReader;
//! use std::path::Path;
//!
//! let reader = StatementReader::new(Path::new("account_statement.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(tx) => println!("{} {}", tx.date, tx.balance),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - A missing or unreadable file is returned from `new()`
//! - Malformed rows are yielded as `Err` items carrying their line number,
//!   so callers can skip them and keep reading

use crate::io::csv_format::{convert_statement_record, StatementRecord};
use crate::types::{PortalError, Transaction, TransactionId};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streaming reader over statement rows
#[derive(Debug)]
pub struct StatementReader<R: Read = File> {
    reader: csv::Reader<R>,
    record: StringRecord,
    next_id: TransactionId,
}

impl StatementReader<File> {
    /// Open a statement file
    ///
    /// # Returns
    ///
    /// * `Ok(StatementReader)` if the file opened
    /// * `Err(PortalError::FileNotFound)` if it does not exist
    /// * `Err(PortalError::IoError)` for any other open failure
    pub fn new(path: &Path) -> Result<Self, PortalError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PortalError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => PortalError::from(e),
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> StatementReader<R> {
    /// Wrap any reader yielding statement CSV
    pub fn from_reader(input: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .buffer_capacity(8 * 1024)
            .from_reader(input);

        Self {
            reader,
            record: StringRecord::new(),
            next_id: 1,
        }
    }

    /// Read every row, dropping malformed ones with a warning
    pub fn read_all(self) -> Vec<Transaction> {
        self.filter_map(|result| match result {
            Ok(tx) => Some(tx),
            Err(e) => {
                tracing::warn!("Skipping statement row: {}", e);
                None
            }
        })
        .collect()
    }
}

impl<R: Read> Iterator for StatementReader<R> {
    type Item = Result<Transaction, PortalError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Line where the row starts; quoted fields may span several lines
        let line = match self.reader.read_record(&mut self.record) {
            Ok(false) => return None,
            Ok(true) => self.record.position().map(|pos| pos.line()),
            Err(e) => return Some(Err(PortalError::from(e))),
        };

        let record = match self.reader.headers() {
            Ok(headers) => self.record.deserialize::<StatementRecord>(Some(headers)),
            Err(e) => Err(e),
        };

        let item = record
            .map_err(PortalError::from)
            .and_then(|record| convert_statement_record(record, self.next_id))
            .map_err(|e| match e {
                PortalError::ParseError { message, .. } => PortalError::ParseError { line, message },
                other => PortalError::ParseError {
                    line,
                    message: other.to_string(),
                },
            });

        if item.is_ok() {
            self.next_id += 1;
        }
        Some(item)
    }
}
