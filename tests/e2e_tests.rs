//! End-to-end integration tests
//!
//! These tests validate the complete statement pipeline using predefined
//! fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Loads the filter settings from filter.json
//! 3. Filters the statement as of 15 January 2024
//! 4. Exports the displayed lines and compares them with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - The default view (first five lines)
//! - Type, amount, period and count filters, alone and combined
//! - Views that end up empty and export the built-in lines instead
//! - Malformed rows, balances and dates
//! - Quoting of commas, quotes and line breaks

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_portal_engine::core::transaction_store::{fallback_transactions, StatementSource};
    use rust_portal_engine::io::{ExportNaming, StatementExport, StatementReader};
    use rust_portal_engine::{FilterConfig, FilterEngine, TransactionStore};
    use std::fs;
    use std::path::Path;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// Run a fixture and compare the export with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if a fixture file is missing or the export differs.
    fn run_test_fixture(fixture_name: &str) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let filter_path = format!("{}/filter.json", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        for path in [&input_path, &filter_path, &expected_path] {
            assert!(Path::new(path).exists(), "Fixture file not found: {}", path);
        }

        let config: FilterConfig = serde_json::from_str(
            &fs::read_to_string(&filter_path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", filter_path, e)),
        )
        .unwrap_or_else(|e| panic!("Invalid filter in {}: {}", filter_path, e));

        let lines = StatementReader::new(Path::new(&input_path))
            .unwrap_or_else(|e| panic!("Failed to open {}: {}", input_path, e))
            .read_all();

        let mut store = TransactionStore::new();
        store.load(lines, StatementSource::Local);
        store.apply(&FilterEngine::new(config).with_today(today()));

        let export = StatementExport::build(
            store.displayed(),
            &fallback_transactions(),
            ExportNaming::Dated,
            today(),
        )
        .unwrap_or_else(|e| panic!("Failed to export: {}", e));
        assert_eq!(export.file_name, "account_statement_2024-01-15.csv");

        let actual_output = String::from_utf8(export.contents).expect("Export is not UTF-8");
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {}\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("default_view")]
    #[case("debit_only")]
    #[case("credit_first_three")]
    #[case("amount_range")]
    #[case("period_week")]
    #[case("combined_filters")]
    #[case("no_types_exports_fallback")]
    #[case("unparseable_bound")]
    #[case("malformed_data")]
    #[case("quoted_fields")]
    fn test_fixtures(#[case] fixture: &str) {
        run_test_fixture(fixture);
    }
}
