//! # Budget Client SDK
//!
//! A typed Rust client for the Budget API.

use budget_types::{ErrorBody, Transaction, TransactionDetails, TransactionUid};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Budget API client.
pub struct BudgetClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl BudgetClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the ID token sent as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Lists the caller's transactions, newest first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.send(self.request(Method::GET, "/api/transactions"))
            .await
    }

    /// Gets one of the caller's transactions.
    pub async fn get_transaction(&self, uid: TransactionUid) -> Result<Transaction, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/transactions/{}", uid)))
            .await
    }

    /// Creates a transaction owned by the caller.
    pub async fn create_transaction(
        &self,
        details: &TransactionDetails,
    ) -> Result<Transaction, ClientError> {
        self.send(self.request(Method::POST, "/api/transactions").json(details))
            .await
    }

    /// Replaces the editable fields of one of the caller's transactions.
    pub async fn update_transaction(
        &self,
        uid: TransactionUid,
        details: &TransactionDetails,
    ) -> Result<Transaction, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("/api/transactions/{}", uid))
                .json(details),
        )
        .await
    }

    /// Deletes one of the caller's transactions, returning its last state.
    pub async fn delete_transaction(
        &self,
        uid: TransactionUid,
    ) -> Result<Transaction, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/transactions/{}", uid)))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }
}

/// Builds an [`ClientError::Api`] from a failed response body.
///
/// Error bodies normally follow [`ErrorBody`]; the rate limiter only sends `error`.
fn api_error(status: u16, body: String) -> ClientError {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
        return ClientError::Api {
            status,
            kind: Some(err.error),
            message: err.message,
        };
    }

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or(body);
    ClientError::Api {
        status,
        kind: None,
        message,
    }
}
