//! Command pipelines behind the CLI
//!
//! Each command reads its input, runs it through the core and writes the
//! result to the given writer. Recoverable problems (bad CSV rows, an
//! unreachable API) are logged and worked around; only fatal ones come back
//! as errors.

use super::args::{CliArgs, Command, StatementArgs};
use crate::client::{load_statement, ApiConfig, NotificationPoller, PortalApi, PortalClient};
use crate::core::balance::format_display_amount;
use crate::core::catalogue::{
    format_display_date, maturity_date, project_interest, savings_options, value_date,
};
use crate::core::filter_engine::FilterEngine;
use crate::core::transaction_store::{fallback_transactions, StatementSource, TransactionStore};
use crate::io::{StatementExport, StatementReader};
use crate::types::{AmountInput, PortalError, SavingsProduct};
use chrono::NaiveDate;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run the parsed command line, writing its output to `output`
pub async fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), PortalError> {
    let today = chrono::Local::now().date_naive();
    let api = args.api.to_api_config();

    match &args.command {
        Command::Statement(statement) => {
            run_statement(statement, &api, statement.today.unwrap_or(today), output).await
        }
        Command::Products { product, amount } => {
            let products: Vec<SavingsProduct> = match product {
                Some(product) => vec![(*product).into()],
                None => SavingsProduct::ALL.to_vec(),
            };
            write_products(&products, amount.as_ref(), today, output)
        }
        Command::Messages { watch } => {
            let client = PortalClient::new(api)?;
            match watch {
                Some(seconds) => watch_messages(client, Duration::from_secs(*seconds), output).await,
                None => {
                    let count = client.unread_count(&CancellationToken::new()).await?;
                    writeln!(output, "{count}")?;
                    Ok(())
                }
            }
        }
    }
}

/// Load, filter and export a statement
///
/// The statement comes from `--input`, the built-in lines with `--offline`,
/// or the API. The export is printed to `output` unless an output directory
/// is set.
pub async fn run_statement(
    args: &StatementArgs,
    api: &ApiConfig,
    today: NaiveDate,
    output: &mut dyn Write,
) -> Result<(), PortalError> {
    let filter = args.to_filter_config()?;
    let mut store = TransactionStore::new();

    if let Some(path) = &args.input {
        store.load(StatementReader::new(path)?.read_all(), StatementSource::Local);
    } else if args.offline {
        store.load(fallback_transactions(), StatementSource::Fallback);
    } else {
        let client = PortalClient::new(api.clone())?;
        load_statement(&client, &args.account, &CancellationToken::new(), &mut store).await?;
    }

    let engine = FilterEngine::new(filter).with_today(today);
    let shown = store.apply(&engine).len();
    tracing::info!(
        "Showing {} of {} lines from {}",
        shown,
        store.base().len(),
        store.source()
    );

    let export = StatementExport::build(
        store.displayed(),
        &fallback_transactions(),
        args.export_naming(),
        today,
    )?;

    match &args.output_dir {
        Some(dir) => {
            let path = export.write_to_dir(dir)?;
            writeln!(output, "{}", path.display())?;
        }
        None => output.write_all(&export.contents)?,
    }
    Ok(())
}

/// Print the options of `products` with their dates
///
/// With an amount, the interest of each fixed-rate option is projected too.
pub fn write_products(
    products: &[SavingsProduct],
    amount: Option<&AmountInput>,
    today: NaiveDate,
    output: &mut dyn Write,
) -> Result<(), PortalError> {
    let principal = match amount {
        Some(input) => input.value()?,
        None => None,
    };
    let value = value_date(today);

    for product in products {
        writeln!(output, "{} (value date {})", product, format_display_date(value))?;

        for option in savings_options(*product) {
            write!(
                output,
                "  {:<10} {:<22} {:<26} matures {}",
                option.id,
                option.term,
                option.interest,
                format_display_date(maturity_date(today, &option))
            )?;
            if let Some(projection) =
                principal.and_then(|principal| project_interest(principal, &option, value))
            {
                write!(
                    output,
                    "  interest {} in {} payment(s)",
                    format_display_amount(projection.total),
                    projection.payments.len()
                )?;
            }
            writeln!(output)?;
        }
    }
    Ok(())
}

/// Poll the unread counter for `duration`
///
/// Prints the first count that comes in and every change after it.
pub async fn watch_messages<A: PortalApi>(
    api: A,
    duration: Duration,
    output: &mut dyn Write,
) -> Result<(), PortalError> {
    let token = CancellationToken::new();
    let (poller, handle) = NotificationPoller::new(api, token.clone());
    let mut updates = handle.subscribe();

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);
    let run = poller.run();
    tokio::pin!(run);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = &mut run => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(count) = *updates.borrow_and_update() {
                    writeln!(output, "{count}")?;
                }
            }
        }
    }

    handle.stop();
    Ok(())
}
