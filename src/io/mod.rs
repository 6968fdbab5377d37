//! I/O module
//!
//! Handles statement CSV reading and export.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, serialization)
//! - `statement_reader` - Statement reader with iterator interface
//! - `export` - Download naming and the rendered export

pub mod csv_format;
pub mod export;
pub mod statement_reader;

pub use csv_format::{convert_statement_record, write_statement_csv, StatementRecord};
pub use export::{select_export_rows, statement_file_name, ExportNaming, StatementExport};
pub use statement_reader::StatementReader;
