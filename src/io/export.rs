//! Statement download
//!
//! Builds the file a customer downloads from the statement view: the CSV
//! text, its MIME type and a file name.

use crate::io::csv_format::write_statement_csv;
use crate::types::{PortalError, Transaction};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// MIME type of an exported statement
pub const STATEMENT_CSV_MIME: &str = "text/csv;charset=utf-8;";

/// Number of fallback lines exported when nothing is displayed
pub const FALLBACK_EXPORT_ROWS: usize = 5;

/// How the download is named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportNaming {
    /// `account_statement_<YYYY-MM-DD>.csv`
    #[default]
    Dated,
    /// `account_statement.csv`
    Fixed,
}

/// File name of a statement exported on `date`
pub fn statement_file_name(naming: ExportNaming, date: NaiveDate) -> String {
    match naming {
        ExportNaming::Dated => format!("account_statement_{}.csv", date.format("%Y-%m-%d")),
        ExportNaming::Fixed => "account_statement.csv".to_string(),
    }
}

/// Lines that go into the export
///
/// The displayed lines, or the first few fallback lines when the view shows
/// nothing.
pub fn select_export_rows<'a>(
    displayed: &'a [Transaction],
    fallback: &'a [Transaction],
) -> &'a [Transaction] {
    if displayed.is_empty() {
        tracing::debug!("Nothing displayed, exporting fallback lines");
        &fallback[..fallback.len().min(FALLBACK_EXPORT_ROWS)]
    } else {
        displayed
    }
}

/// A rendered statement download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementExport {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: Vec<u8>,
}

impl StatementExport {
    /// Render the export for the given view
    pub fn build(
        displayed: &[Transaction],
        fallback: &[Transaction],
        naming: ExportNaming,
        date: NaiveDate,
    ) -> Result<Self, PortalError> {
        let rows = select_export_rows(displayed, fallback);
        let mut contents = Vec::new();
        write_statement_csv(rows, &mut contents)?;

        Ok(StatementExport {
            file_name: statement_file_name(naming, date),
            mime: STATEMENT_CSV_MIME,
            contents,
        })
    }

    /// Save the export into `dir`, returning the written path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, PortalError> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        tracing::info!("Statement exported to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction_store::fallback_transactions;
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[rstest]
    #[case(ExportNaming::Dated, "account_statement_2024-01-15.csv")]
    #[case(ExportNaming::Fixed, "account_statement.csv")]
    fn test_statement_file_name(#[case] naming: ExportNaming, #[case] expected: &str) {
        assert_eq!(statement_file_name(naming, date()), expected);
    }

    #[test]
    fn test_empty_view_exports_first_five_fallback_lines() {
        let fallback = fallback_transactions();
        let export = StatementExport::build(&[], &fallback, ExportNaming::Dated, date()).unwrap();

        let text = String::from_utf8(export.contents).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert_eq!(export.mime, "text/csv;charset=utf-8;");
    }

    #[test]
    fn test_displayed_lines_take_precedence() {
        let fallback = fallback_transactions();
        let displayed = &fallback[7..];
        assert_eq!(select_export_rows(displayed, &fallback), displayed);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = fallback_transactions();
        let export =
            StatementExport::build(&fallback, &fallback, ExportNaming::Fixed, date()).unwrap();

        let path = export.write_to_dir(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("account_statement.csv"));
        assert_eq!(fs::read(&path).unwrap(), export.contents);
    }
}
