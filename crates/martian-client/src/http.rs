//! Internal HTTP transport.
//!
//! One shared [`Transport`] sits behind every sub-client. It owns the
//! org-scoped base URL, applies the bearer credential at the point of use,
//! maps status codes onto [`ClientError`], and retries retryable failures of
//! idempotent (GET) requests with exponential backoff. Mutating requests are
//! never retried.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credential::ApiCredential;
use crate::error::{ClientError, Result};

/// User agent for API requests.
const USER_AGENT_VALUE: &str = concat!("martian-client/", env!("CARGO_PKG_VERSION"));

pub(crate) struct Transport {
    client: reqwest::Client,
    base_url: String,
    gateway_url: String,
    credential: ApiCredential,
    request_timeout: Duration,
    evaluation_timeout: Duration,
    max_retries: usize,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        if config.credential().is_empty() {
            return Err(ClientError::NotConfigured(
                "Martian API key is empty".to_string(),
            ));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            gateway_url: config.resolved_gateway_url(),
            credential: config.credential().clone(),
            request_timeout: config.request_timeout,
            evaluation_timeout: config.evaluation_timeout,
            max_retries: config.max_retries as usize,
        })
    }

    /// GET with retry, returning the parsed JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = (|| async {
            let request = self.client.get(&url).query(query);
            self.dispatch(request, path, self.request_timeout).await
        })
        .retry(ExponentialBuilder::default().with_max_times(self.max_retries))
        .when(ClientError::is_retryable)
        .notify(|err: &ClientError, backoff: Duration| {
            warn!(error = %err, backoff = ?backoff, "retrying request");
        })
        .await?;

        Self::parse_json(response).await
    }

    /// POST with a JSON body, no retry.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T> {
        self.send_json(reqwest::Method::POST, path, query, body, self.request_timeout)
            .await
    }

    /// POST for calls that block on server-side LLM work (judge evaluation),
    /// using the longer evaluation timeout.
    pub(crate) async fn post_json_long<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(reqwest::Method::POST, path, &[], body, self.evaluation_timeout)
            .await
    }

    /// PATCH with a JSON body, no retry.
    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(reqwest::Method::PATCH, path, &[], body, self.request_timeout)
            .await
    }

    /// POST against the OpenAI-compatible gateway (router runs).
    pub(crate) async fn post_gateway<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.gateway_url, path);
        debug!(url = %url, "POST (gateway)");

        let request = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.evaluation_timeout);
        let response = self.dispatch(request, path, self.evaluation_timeout).await?;
        Self::parse_json(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, method = %method, "request");

        let request = self
            .client
            .request(method, &url)
            .query(query)
            .json(body)
            .timeout(timeout);
        let response = self.dispatch(request, path, timeout).await?;
        Self::parse_json(response).await
    }

    /// Send one request: attach the credential, map transport failures and
    /// non-success statuses onto [`ClientError`].
    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        // The credential is exposed only here, at the point of use.
        let response = request
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.credential.expose()),
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(timeout)
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => Ok(response),

            401 | 403 => Err(ClientError::Auth(error_message(response).await)),

            404 => Err(ClientError::NotFound(path.to_string())),

            409 => Err(ClientError::AlreadyExists(path.to_string())),

            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(ClientError::RateLimited { retry_after })
            }

            code => Err(ClientError::Api {
                status: code,
                message: error_message(response).await,
            }),
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Error responses come as `{"error": {"message": ...}}` or `{"message": ...}`
/// depending on the endpoint; fall back to the raw body.
async fn error_message(response: reqwest::Response) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<ErrorDetail>,
        message: Option<String>,
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body
            .error
            .map(|e| e.message)
            .or(body.message)
            .unwrap_or(text),
        Err(_) => text,
    }
}
