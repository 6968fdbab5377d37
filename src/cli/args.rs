use crate::client::config::{
    ApiConfig, DEFAULT_BASE_URL, DEFAULT_CHANNEL_CODE, DEFAULT_COUNTRY_CODE, DEFAULT_CUSTOMER_ID,
    DEFAULT_LANG, DEFAULT_USERNAME,
};
use crate::core::transaction_store::FALLBACK_ACCOUNT;
use crate::io::ExportNaming;
use crate::types::{AmountInput, FilterConfig, PeriodFilter, PortalError, SavingsProduct};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Statement, savings catalogue and notification tooling for the savings portal
#[derive(Parser, Debug)]
#[command(name = "portal-engine")]
#[command(about = "Savings portal statement and product tooling", long_about = None)]
pub struct CliArgs {
    /// Log filter directive, e.g. `info` or `rust_portal_engine=debug`
    #[arg(long = "log-level", global = true, default_value = "warn", env = "PORTAL_LOG")]
    pub log_level: String,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load, filter and export an account statement
    Statement(StatementArgs),

    /// List the savings products with their value and maturity dates
    Products {
        /// Only show this product
        #[arg(long = "product", value_name = "PRODUCT")]
        product: Option<ProductArg>,

        /// Project the interest on this deposit for fixed-rate options
        #[arg(long = "amount", value_name = "AMOUNT")]
        amount: Option<AmountInput>,
    },

    /// Show the number of unread messages
    Messages {
        /// Keep polling for this many seconds, printing every change
        #[arg(long = "watch", value_name = "SECONDS")]
        watch: Option<u64>,
    },
}

/// Connection settings of the portal API
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    #[arg(long = "api-url", global = true, env = "PORTAL_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long = "channel-code", global = true, env = "PORTAL_CHANNEL_CODE", default_value = DEFAULT_CHANNEL_CODE)]
    pub channel_code: String,

    #[arg(long = "username", global = true, env = "PORTAL_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    #[arg(long = "lang", global = true, env = "PORTAL_LANG", default_value = DEFAULT_LANG)]
    pub lang: String,

    #[arg(long = "country-code", global = true, env = "PORTAL_COUNTRY_CODE", default_value = DEFAULT_COUNTRY_CODE)]
    pub country_code: String,

    #[arg(long = "customer-id", global = true, env = "PORTAL_CUSTOMER_ID", default_value = DEFAULT_CUSTOMER_ID)]
    pub customer_id: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", global = true, env = "PORTAL_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct StatementArgs {
    /// Read the statement from an exported CSV file instead of the API
    #[arg(long = "input", value_name = "FILE", conflicts_with = "offline")]
    pub input: Option<PathBuf>,

    /// Account whose statement is fetched
    #[arg(long = "account", value_name = "IBAN", default_value = FALLBACK_ACCOUNT)]
    pub account: String,

    /// Skip the API and use the built-in statement
    #[arg(long = "offline")]
    pub offline: bool,

    /// Filter settings as JSON; flags below override it
    #[arg(long = "filter", value_name = "FILE")]
    pub filter_file: Option<PathBuf>,

    /// Hide debit lines
    #[arg(long = "no-debit")]
    pub no_debit: bool,

    /// Hide credit lines
    #[arg(long = "no-credit")]
    pub no_credit: bool,

    /// Lowest absolute amount, e.g. `100` or `99,50`
    #[arg(long = "min", value_name = "AMOUNT")]
    pub min_amount: Option<AmountInput>,

    /// Highest absolute amount
    #[arg(long = "max", value_name = "AMOUNT")]
    pub max_amount: Option<AmountInput>,

    /// Only keep lines booked within this period
    #[arg(long = "period", value_name = "PERIOD")]
    pub period: Option<PeriodFilter>,

    /// Maximum number of lines
    #[arg(long = "count", value_name = "N", conflicts_with = "all")]
    pub count: Option<usize>,

    /// Keep every matching line
    #[arg(long = "all")]
    pub all: bool,

    /// Reference day for the period filter (YYYY-MM-DD), defaults to today
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Save the export into this directory instead of printing it
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name the export `account_statement.csv` instead of adding the date
    #[arg(long = "fixed-name")]
    pub fixed_name: bool,
}

/// Product names accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProductArg {
    MaxiSpaar,
    SolidExtra,
    CombiSpaar,
}

impl From<ProductArg> for SavingsProduct {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::MaxiSpaar => SavingsProduct::MaxiSpaar,
            ProductArg::SolidExtra => SavingsProduct::SolidExtra,
            ProductArg::CombiSpaar => SavingsProduct::CombiSpaar,
        }
    }
}

impl ApiArgs {
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            channel_code: self.channel_code.clone(),
            username: self.username.clone(),
            lang: self.lang.clone(),
            country_code: self.country_code.clone(),
            customer_id: self.customer_id.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl StatementArgs {
    /// Build the filter from the JSON file, if any, and the flags
    ///
    /// Amount and period flags switch their filter on. Without `--count` or
    /// `--all` the file's count, or the default of 5, is kept.
    pub fn to_filter_config(&self) -> Result<FilterConfig, PortalError> {
        let mut config = match &self.filter_file {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => FilterConfig::default(),
        };

        if self.no_debit {
            config.debit_transactions = false;
        }
        if self.no_credit {
            config.credit_transactions = false;
        }
        if self.min_amount.is_some() || self.max_amount.is_some() {
            config.amount_filter = true;
            config.min_amount = self.min_amount.clone().unwrap_or_default();
            config.max_amount = self.max_amount.clone().unwrap_or_default();
        }
        if let Some(period) = self.period {
            config.period = period;
            config.period_enabled = true;
        }
        if self.all {
            config.transactions_count = None;
        } else if let Some(count) = self.count {
            config.transactions_count = Some(count);
        }

        Ok(config)
    }

    pub fn export_naming(&self) -> ExportNaming {
        if self.fixed_name {
            ExportNaming::Fixed
        } else {
            ExportNaming::Dated
        }
    }
}
