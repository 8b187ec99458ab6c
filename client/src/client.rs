use std::time::Duration;

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue},
};
use sentinel_common::views::{ApiErrorResponse, FailureResponse};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{config::ClientConfig, error::SyncError};

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("API token is not a valid header value")]
    InvalidToken(#[from] InvalidHeaderValue),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Thin JSON client for the dashboard backend. Cloning is cheap; clones
/// share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    api_url: String,
    client: Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(
        api_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiClientError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        if let Some(token) = api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(format!("sentinel-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            api_url,
            client,
            timeout,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiClientError> {
        Self::new(
            config.api_url.clone(),
            config.api_token.clone(),
            config.request_timeout(),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn transport_error(&self, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout {
                after: self.timeout,
            }
        } else {
            SyncError::Transport(err)
        }
    }

    /// POST a JSON body and return the decoded JSON response.
    ///
    /// Non-2xx statuses and 2xx bodies whose `status` field reports a
    /// failure both come back as errors.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, SyncError> {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            debug!(%url, %status, "request failed");
            return Err(match serde_json::from_slice::<ApiErrorResponse>(&bytes) {
                Ok(body) => SyncError::Api {
                    status: status.as_u16(),
                    body,
                },
                Err(_) => SyncError::UnexpectedStatus {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
            });
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        check_response_status(&value)?;

        Ok(value)
    }
}

/// The backend reports some failures with a 2xx status and a `status`
/// field other than `SUCCESS`/`QUEUED`. Bodies without a recognisable
/// `status` are taken at face value.
fn check_response_status(value: &Value) -> Result<(), SyncError> {
    if value.get("status").is_none() {
        return Ok(());
    }

    match serde_json::from_value::<FailureResponse>(value.clone()) {
        Ok(failure) if !failure.status.is_success() => Err(SyncError::Rejected {
            status: failure.status,
            reason: failure.reason,
        }),
        _ => Ok(()),
    }
}
