//! Request issuer shared by every administrative operation
//!
//! Each attempt builds a fresh request carrying `Content-Type: application/json`
//! and, when both parts of the credential pair are set, HTTP Basic auth.
//! Transport failures (connect, DNS, timeout, connection closed before a
//! response) are retried per [`RetryConfig`]. Any received response ends the
//! loop, whatever its status; status handling belongs to the caller.

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::retry::RetryConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct RequestIssuer {
    http: HttpClient,
    credentials: Option<(String, String)>,
    retry: RetryConfig,
}

impl RequestIssuer {
    pub fn new(config: &AdminConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(AdminError::Request)?;

        Ok(Self {
            http,
            credentials: config
                .credentials()
                .map(|(user, pass)| (user.to_string(), pass.to_string())),
            retry: config.retry.clone(),
        })
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Build the request for one attempt
    fn build(&self, method: Method, url: &Url, body: Option<&Value>) -> Result<reqwest::Request> {
        let mut builder = self
            .http
            .request(method, url.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some((user, pass)) = &self.credentials {
            builder = builder.basic_auth(user, Some(pass));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder.build().map_err(AdminError::Request)
    }

    /// Send `method url` with retry and backoff on transport failure
    pub async fn issue(&self, method: Method, url: &Url, body: Option<&Value>) -> Result<Response> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = self.build(method.clone(), url, body)?;
            debug!(method = %method, url = %url, attempt, "Issuing admin request");

            match self.http.execute(request).await {
                Ok(response) => {
                    debug!(url = %url, status = %response.status(), attempt, "Admin request answered");
                    return Ok(response);
                }
                Err(e) if attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        url = %url,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transport failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(source) => {
                    return Err(AdminError::Transport {
                        url: url.to_string(),
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }
}

/// Read the whole body and decode it as JSON
///
/// A failure while reading the body is reported as `AdminError::Body`. The
/// body read is never retried since the request may already have taken effect.
pub async fn decode_json<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(|source| AdminError::Body {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| AdminError::Decode {
        url: url.to_string(),
        source,
    })
}
