//! Loading view data through a [`PortalApi`]
//!
//! Network failures never leave a view empty: the statement falls back to
//! the built-in lines and the IBAN list to the default accounts. A cancelled
//! load is the exception. It changes nothing and reports
//! [`PortalError::Cancelled`].

use super::http::PortalApi;
use crate::core::catalogue::default_iban_options;
use crate::core::transaction_store::{fallback_transactions, StatementSource, TransactionStore};
use crate::core::wizard::{ChangePasswordForm, PasswordChange, PasswordCheck};
use crate::types::{IbanOption, PortalError, SavingsProduct};
use tokio_util::sync::CancellationToken;

/// Lines requested for a statement view
pub const STATEMENT_PAGE_SIZE: u32 = 50;

/// Account number part of a Dutch IBAN, or the input unchanged
///
/// `NL24DHBN2018470578` becomes `2018470578`.
pub fn statement_account_number(iban: &str) -> &str {
    match iban.get(8..) {
        Some(number) if iban.len() == 18 && iban.starts_with("NL") => number,
        _ => iban,
    }
}

/// Fill `store` with the statement of `iban`
///
/// Returns where the lines came from. On any error other than cancellation
/// the built-in statement is loaded instead.
pub async fn load_statement<A: PortalApi>(
    api: &A,
    iban: &str,
    token: &CancellationToken,
    store: &mut TransactionStore,
) -> Result<StatementSource, PortalError> {
    let account_number = statement_account_number(iban);

    match api
        .statement(account_number, 0, STATEMENT_PAGE_SIZE, token)
        .await
    {
        Ok(page) => {
            store.load(page.into_transactions(iban), StatementSource::Api);
        }
        Err(PortalError::Cancelled) => {
            tracing::debug!("Statement load for {} cancelled", iban);
            return Err(PortalError::Cancelled);
        }
        Err(e) => {
            tracing::warn!("Failed to load transactions: {}. Using built-in statement", e);
            store.load(fallback_transactions(), StatementSource::Fallback);
        }
    }

    Ok(store.source())
}

/// IBAN options for `product`, or the defaults when the call fails
pub async fn load_iban_options<A: PortalApi>(
    api: &A,
    product: SavingsProduct,
    token: &CancellationToken,
) -> Result<Vec<IbanOption>, PortalError> {
    match api.iban_options(product, token).await {
        Ok(options) if !options.is_empty() => Ok(options),
        Ok(_) => Ok(default_iban_options()),
        Err(PortalError::Cancelled) => Err(PortalError::Cancelled),
        Err(e) => {
            tracing::warn!("Failed to load IBAN options for {}: {}", product, e);
            Ok(default_iban_options())
        }
    }
}

/// Everything an account opening page needs, fetched concurrently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningData {
    pub iban_options: Vec<IbanOption>,
    pub unread_messages: u32,
}

/// Fetch the IBAN options and the unread counter at the same time
pub async fn load_opening_data<A: PortalApi>(
    api: &A,
    product: SavingsProduct,
    token: &CancellationToken,
) -> Result<OpeningData, PortalError> {
    let (iban_options, unread) = futures::join!(
        load_iban_options(api, product, token),
        api.unread_count(token)
    );

    let unread_messages = match unread {
        Ok(count) => count,
        Err(PortalError::Cancelled) => return Err(PortalError::Cancelled),
        Err(e) => {
            tracing::warn!("Failed to load unread message count: {}", e);
            0
        }
    };

    Ok(OpeningData {
        iban_options: iban_options?,
        unread_messages,
    })
}

/// Holder name of `iban`, if the lookup succeeds
///
/// Used to show who owns a new counter account before it is confirmed.
pub async fn lookup_holder<A: PortalApi>(
    api: &A,
    iban: &str,
    token: &CancellationToken,
) -> Result<Option<String>, PortalError> {
    match api.account_by_iban(iban, token).await {
        Ok(account) if !account.holder_name.is_empty() => Ok(Some(account.holder_name)),
        Ok(_) => Ok(None),
        Err(PortalError::Cancelled) => Err(PortalError::Cancelled),
        Err(e) => {
            tracing::warn!("Account lookup for {} failed: {}", iban, e);
            Ok(None)
        }
    }
}

/// Check the form's current password with the server and record the result
///
/// An empty password is left unchecked. A failed call is recorded as
/// [`PasswordCheck::Failed`]; a cancelled one leaves the form untouched.
pub async fn check_current_password<A: PortalApi>(
    api: &A,
    form: &mut ChangePasswordForm,
    token: &CancellationToken,
) -> Result<PasswordCheck, PortalError> {
    if form.current_password.is_empty() {
        form.current_password_check = PasswordCheck::Unchecked;
        return Ok(PasswordCheck::Unchecked);
    }

    let check = match api.validate_password(&form.current_password, token).await {
        Ok(answer) if answer.valid => PasswordCheck::Valid,
        Ok(answer) => {
            tracing::debug!("Current password rejected: {}", answer.message);
            PasswordCheck::Invalid
        }
        Err(PortalError::Cancelled) => return Err(PortalError::Cancelled),
        Err(e) => {
            tracing::warn!("Failed to validate password: {}", e);
            PasswordCheck::Failed
        }
    };

    form.current_password_check = check;
    Ok(check)
}

/// Store the new password of a verified change
pub async fn submit_password_change<A: PortalApi>(
    api: &A,
    change: &PasswordChange,
    token: &CancellationToken,
) -> Result<(), PortalError> {
    api.update_password(&change.new_password, token).await
}
