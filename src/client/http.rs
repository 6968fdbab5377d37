//! HTTP access to the portal API
//!
//! Every call takes a [`CancellationToken`]. Cancelling the token while the
//! request is in flight drops the request and returns
//! [`PortalError::Cancelled`].

use super::config::ApiConfig;
use super::payload::{
    decode_payload, error_message, AccountByIban, PasswordValidation, StatementPage, UnreadCount,
};
use crate::types::{IbanOption, PortalError, SavingsProduct};
use std::future::Future;
use reqwest::{Method, RequestBuilder};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Calls the portal makes against its backend
#[allow(async_fn_in_trait)]
pub trait PortalApi {
    /// One page of the statement of `account_number`
    async fn statement(
        &self,
        account_number: &str,
        page_index: u32,
        page_size: u32,
        token: &CancellationToken,
    ) -> Result<StatementPage, PortalError>;

    /// Accounts the customer can fund a new savings account from
    async fn iban_options(
        &self,
        product: SavingsProduct,
        token: &CancellationToken,
    ) -> Result<Vec<IbanOption>, PortalError>;

    /// Holder details of an external account
    async fn account_by_iban(
        &self,
        iban: &str,
        token: &CancellationToken,
    ) -> Result<AccountByIban, PortalError>;

    /// Number of unread messages of the customer
    async fn unread_count(&self, token: &CancellationToken) -> Result<u32, PortalError>;

    /// Check the customer's current password
    async fn validate_password(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Result<PasswordValidation, PortalError>;

    /// Replace the customer's password
    async fn update_password(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Result<(), PortalError>;
}

impl<T: PortalApi> PortalApi for Arc<T> {
    async fn statement(
        &self,
        account_number: &str,
        page_index: u32,
        page_size: u32,
        token: &CancellationToken,
    ) -> Result<StatementPage, PortalError> {
        (**self)
            .statement(account_number, page_index, page_size, token)
            .await
    }

    async fn iban_options(
        &self,
        product: SavingsProduct,
        token: &CancellationToken,
    ) -> Result<Vec<IbanOption>, PortalError> {
        (**self).iban_options(product, token).await
    }

    async fn account_by_iban(
        &self,
        iban: &str,
        token: &CancellationToken,
    ) -> Result<AccountByIban, PortalError> {
        (**self).account_by_iban(iban, token).await
    }

    async fn unread_count(&self, token: &CancellationToken) -> Result<u32, PortalError> {
        (**self).unread_count(token).await
    }

    async fn validate_password(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Result<PasswordValidation, PortalError> {
        (**self).validate_password(password, token).await
    }

    async fn update_password(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Result<(), PortalError> {
        (**self).update_password(password, token).await
    }
}

/// Run `future` unless `token` is cancelled first
pub async fn with_cancel<T, F>(token: &CancellationToken, future: F) -> Result<T, PortalError>
where
    F: Future<Output = Result<T, PortalError>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(PortalError::Cancelled),
        result = future => result,
    }
}

/// reqwest-backed [`PortalApi`]
#[derive(Debug, Clone)]
pub struct PortalClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl PortalClient {
    pub fn new(config: ApiConfig) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Request to `endpoint` carrying the portal headers
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut request = self.http.request(method, url);
        for (name, value) in self.config.default_headers() {
            request = request.header(name, value);
        }
        request
    }

    /// Send `request` and return the body of a successful response
    async fn send(
        &self,
        request: RequestBuilder,
        token: &CancellationToken,
    ) -> Result<String, PortalError> {
        with_cancel(token, async {
            let response = request.send().await?;
            let status = response.status();
            let url = response.url().clone();
            let body = response.text().await?;

            if !status.is_success() {
                let message = error_message(status.as_u16(), &body);
                tracing::debug!("{} failed with {}: {}", url.path(), status, message);
                return Err(PortalError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            Ok(body)
        })
        .await
    }
}

impl PortalApi for PortalClient {
    async fn statement(
        &self,
        account_number: &str,
        page_index: u32,
        page_size: u32,
        token: &CancellationToken,
    ) -> Result<StatementPage, PortalError> {
        let endpoint = format!("/accounts/saving/statement/{account_number}/{page_index}/{page_size}");
        let body = self.send(self.request(Method::GET, &endpoint), token).await?;
        decode_payload(&body)
    }

    async fn iban_options(
        &self,
        product: SavingsProduct,
        token: &CancellationToken,
    ) -> Result<Vec<IbanOption>, PortalError> {
        let endpoint = format!("/api/{}/iban-options", product.api_slug());
        let body = self.send(self.request(Method::GET, &endpoint), token).await?;
        decode_payload(&body)
    }

    async fn account_by_iban(
        &self,
        iban: &str,
        token: &CancellationToken,
    ) -> Result<AccountByIban, PortalError> {
        let request = self
            .request(Method::GET, "/api/account/by-iban")
            .query(&[("iban", iban)]);
        let body = self.send(request, token).await?;
        decode_payload(&body)
    }

    async fn unread_count(&self, token: &CancellationToken) -> Result<u32, PortalError> {
        let endpoint = format!("/customer/messages/unread/{}", self.config.customer_id);
        let body = self.send(self.request(Method::GET, &endpoint), token).await?;
        let unread: UnreadCount = decode_payload(&body)?;
        Ok(unread.count)
    }

    async fn validate_password(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Result<PasswordValidation, PortalError> {
        let request = self
            .request(Method::POST, "/api/personal-details/validate-password")
            .json(&serde_json::json!({ "password": password }));
        let body = self.send(request, token).await?;
        decode_payload(&body)
    }

    async fn update_password(
        &self,
        password: &str,
        token: &CancellationToken,
    ) -> Result<(), PortalError> {
        let request = self
            .request(Method::PUT, "/api/personal-details/password")
            .json(&serde_json::json!({ "password": password }));
        self.send(request, token).await?;
        tracing::info!("Password updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_with_cancel_returns_result_when_not_cancelled() {
        let token = CancellationToken::new();
        let result = with_cancel(&token, async { Ok::<_, PortalError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_cancel_aborts_pending_call() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            child.cancel();
        });

        let result = with_cancel(&token, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, PortalError>(())
        })
        .await;
        assert_eq!(result, Err(PortalError::Cancelled));
    }

    #[test]
    fn test_iban_lookup_query_is_encoded() {
        let client = PortalClient::new(ApiConfig::default()).unwrap();
        let request = client
            .request(Method::GET, "/api/account/by-iban")
            .query(&[("iban", "NL91 ABNA&0417")])
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/api/account/by-iban");
        assert_eq!(request.url().query(), Some("iban=NL91+ABNA%260417"));
        assert_eq!(request.headers()["channelcode"], "WEB");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let client = PortalClient::new(ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..ApiConfig::default()
        })
        .unwrap();

        let result = client.unread_count(&CancellationToken::new()).await;
        assert!(matches!(result, Err(PortalError::Http { .. })));
    }
}
