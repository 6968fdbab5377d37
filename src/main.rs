//! Savings Portal Engine CLI
//!
//! Command-line front end over the portal engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- statement --offline --all > statement.csv
//! cargo run -- statement --input account_statement.csv --no-credit --min 100 --period month
//! cargo run -- statement --account NL24DHBN2018470578 --output-dir exports --fixed-name
//! cargo run -- products --product maxi-spaar --amount 10000
//! cargo run -- messages --watch 30
//! ```
//!
//! Statements are loaded from a file, the built-in lines, or the portal API
//! (falling back to the built-in lines when it cannot be reached), filtered,
//! and exported as CSV to stdout or into a directory. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, unreadable input, API failure where no
//!   fallback exists, etc.)

use rust_portal_engine::cli;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::parse_args();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
