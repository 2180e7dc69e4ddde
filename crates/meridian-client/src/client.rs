//! Remote backend HTTP client implementation.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use meridian_core::query::{Filter, FilterOp, Operation, QueryRequest, SortKey};
use meridian_core::Record;

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, AuthSession, CredentialsRequest, NewIdentityResponse};

/// The tabular protocol's error code for an unmet single-row expectation.
const ROW_NOT_FOUND_CODE: &str = "PGRST116";

/// Client for the hosted backend: the REST tabular protocol plus the
/// identity-provider API.
///
/// [`QueryRequest`] descriptors map 1:1 onto the wire: READ becomes a
/// filtered GET, INSERT a POST, UPDATE a PATCH with filter predicates, and
/// DELETE a DELETE with filter predicates.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Client,
    base_url: String,
    api_key: String,
    bearer: Option<String>,
}

impl RemoteClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the backend (e.g. `"https://api.example.com"`)
    /// * `api_key` - The project API key
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_options(base_url, api_key, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bearer: None,
        }
    }

    /// Attach a user bearer credential to subsequent requests, as returned
    /// by [`sign_in`](Self::sign_in). Without one, requests authenticate
    /// with the project API key alone.
    #[must_use]
    pub fn with_bearer(mut self, access_token: impl Into<String>) -> Self {
        self.bearer = Some(access_token.into());
        self
    }

    /// Execute a query descriptor against the tabular API and return the
    /// materialized rows (empty for DELETE).
    ///
    /// # Errors
    ///
    /// - [`ClientError::RowNotFound`] when a `single()` request matches no
    ///   rows.
    /// - [`ClientError::Api`]/[`ClientError::Http`] on protocol or transport
    ///   failures.
    pub async fn execute(&self, request: QueryRequest) -> Result<Vec<Record>, ClientError> {
        let url = format!("{}/rest/v1/{}", self.base_url, request.table);
        let is_delete = matches!(request.operation, Operation::Delete);

        // INSERT ignores filters entirely; DELETE materializes no result,
        // so order/limit do not apply to it.
        let mut params: Vec<(String, String)> = match request.operation {
            Operation::Insert(_) => Vec::new(),
            _ => filter_params(&request.filters),
        };
        if !is_delete {
            if let Some(order) = order_param(&request.sort) {
                params.push(("order".into(), order));
            }
            if let Some(n) = request.limit {
                params.push(("limit".into(), n.to_string()));
            }
        }

        let builder = match &request.operation {
            Operation::Read => self.http.get(&url),
            Operation::Insert(rows) => self
                .http
                .post(&url)
                .json(rows)
                .header("prefer", "return=representation"),
            Operation::Update(patch) => self
                .http
                .patch(&url)
                .json(patch)
                .header("prefer", "return=representation"),
            Operation::Delete => self.http.delete(&url),
        };

        let mut builder = self.apply_auth(builder).query(&params);
        if request.single && !is_delete {
            builder = builder.header("accept", "application/vnd.pgrst.object+json");
        }

        tracing::debug!(table = %request.table, "executing remote query");
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        if is_delete {
            return Ok(Vec::new());
        }
        if request.single {
            let record: Record = response.json().await?;
            Ok(vec![record])
        } else {
            Ok(response.json().await?)
        }
    }

    /// Sign in with the password grant and receive a bearer session.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidCredentials`] when the identity provider
    ///   rejects the pair.
    /// - [`ClientError::Api`]/[`ClientError::Http`] otherwise.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .apply_auth(self.http.post(&url))
            .query(&[("grant_type", "password")])
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        handle_response(response).await
    }

    /// Register a new identity.
    ///
    /// # Errors
    ///
    /// - [`ClientError::AlreadyExists`] when the email is taken.
    /// - [`ClientError::Api`]/[`ClientError::Http`] otherwise.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<NewIdentityResponse, ClientError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .apply_auth(self.http.post(&url))
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        handle_response(response).await
    }

    /// Revoke a bearer session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {access_token}"))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Attach the project key and the active credential.
    fn apply_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self.bearer.as_deref().unwrap_or(&self.api_key);
        builder
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {bearer}"))
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

/// Render the query parameters for a filter list.
fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            let op = match filter.op {
                FilterOp::Eq => "eq",
                FilterOp::Neq => "neq",
            };
            (
                filter.column.clone(),
                format!("{op}.{}", render_value(&filter.value)),
            )
        })
        .collect()
}

/// Render the `order` parameter for a sort key list, declaration order.
fn order_param(sort: &[SortKey]) -> Option<String> {
    if sort.is_empty() {
        return None;
    }
    Some(
        sort.iter()
            .map(|key| {
                let direction = if key.ascending { "asc" } else { "desc" };
                format!("{}.{direction}", key.column)
            })
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Render a filter value: strings go bare, everything else as JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a success body or convert the error envelope.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ClientError> {
    if response.status().is_success() {
        return Ok(response.json().await?);
    }
    Err(error_from(response).await)
}

/// Map an error response to a typed error.
async fn error_from(response: Response) -> ClientError {
    let status = response.status();

    match response.json::<ApiErrorResponse>().await {
        Ok(body) => {
            if body.code.as_deref() == Some(ROW_NOT_FOUND_CODE) {
                return ClientError::RowNotFound;
            }
            if body.error.as_deref() == Some("invalid_grant") {
                return ClientError::InvalidCredentials;
            }

            let message = body.message.unwrap_or_default();
            if status == StatusCode::UNPROCESSABLE_ENTITY
                && message.to_lowercase().contains("already registered")
            {
                return ClientError::AlreadyExists;
            }

            ClientError::Api {
                code: body.code.or(body.error).unwrap_or_else(|| "unknown".into()),
                message,
                status: status.as_u16(),
            }
        }
        Err(_) => ClientError::Api {
            code: "unknown".to_string(),
            message: format!("HTTP {status}"),
            status: status.as_u16(),
        },
    }
}
