//! Portal API client
//!
//! The only asynchronous part of the crate. Everything here runs on tokio
//! and takes a `CancellationToken` so a discarded view can abort its calls.
//!
//! - `config` - Base URL, header values and timeout
//! - `payload` - Response bodies and envelope decoding
//! - `http` - The [`PortalApi`] trait and its reqwest implementation
//! - `loader` - Filling views with API data or fallbacks
//! - `poller` - Unread message counter

pub mod config;
pub mod http;
pub mod loader;
pub mod payload;
pub mod poller;

pub use config::ApiConfig;
pub use http::{PortalApi, PortalClient};
pub use loader::{
    check_current_password, load_iban_options, load_opening_data, load_statement, lookup_holder,
    submit_password_change,
};
pub use poller::{NotificationPoller, PollerHandle};
