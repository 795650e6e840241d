//! HTTP client wrapper with retry logic.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::AlpacaErrorResponse;
use super::config::{AlpacaConfig, RetryConfig};
use super::error::AlpacaError;

/// HTTP client for Alpaca API with retry logic.
///
/// `RetryConfig::max_attempts` counts request sends; transient failures
/// back off exponentially between them.
#[derive(Debug, Clone)]
pub struct AlpacaHttpClient {
    client: Client,
    api_key: String,
    api_secret: String,
    trading_base_url: String,
    data_base_url: String,
    retry: RetryConfig,
}

impl AlpacaHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &AlpacaConfig) -> Result<Self, AlpacaError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(AlpacaError::AuthenticationFailed);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AlpacaError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            trading_base_url: config.trading_base_url.clone(),
            data_base_url: config.data_base_url.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Make a GET request to the trading API.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AlpacaError> {
        self.request(Method::GET, &self.trading_base_url, path, None::<&()>)
            .await
    }

    /// Make a POST request to the trading API.
    #[allow(clippy::future_not_send)]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AlpacaError> {
        self.request(Method::POST, &self.trading_base_url, path, Some(body))
            .await
    }

    /// Make a DELETE request to the trading API, discarding the body.
    pub async fn delete(&self, path: &str) -> Result<(), AlpacaError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &self.trading_base_url, path, None::<&()>)
            .await?;
        Ok(())
    }

    /// Make a DELETE request to the trading API, keeping the response body.
    ///
    /// Position liquidation responds with the closing order.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AlpacaError> {
        self.request(Method::DELETE, &self.trading_base_url, path, None::<&()>)
            .await
    }

    /// Make a GET request to the market data API.
    pub async fn data_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AlpacaError> {
        self.request(Method::GET, &self.data_base_url, path, None::<&()>)
            .await
    }

    /// Internal request implementation with retry logic.
    #[allow(clippy::future_not_send)]
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        base_url: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AlpacaError> {
        let url = format!("{base_url}{path}");
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let retries_left = attempt < self.retry.max_attempts;

            let mut request = self
                .client
                .request(method.clone(), &url)
                .header("APCA-API-KEY-ID", &self.api_key)
                .header("APCA-API-SECRET-KEY", &self.api_secret);
            if let Some(b) = body {
                request = request.json(b);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if !retries_left {
                        return Err(AlpacaError::MaxRetriesExceeded { attempts: attempt });
                    }
                    let delay = backoff_for(&self.retry, attempt);
                    tracing::warn!(
                        error = %e,
                        delay_ms = delay.as_millis(),
                        attempt,
                        "Network error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return decode_body(response).await;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                if !retries_left {
                    return Err(AlpacaError::RateLimited {
                        retry_after_secs: retry_after.unwrap_or(60),
                    });
                }
                // Honor the server's pacing when it gives one.
                let delay = retry_after
                    .map_or_else(|| backoff_for(&self.retry, attempt), Duration::from_secs);
                tracing::warn!(delay_ms = delay.as_millis(), attempt, "Rate limited, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            if is_transient(status) && retries_left {
                let delay = backoff_for(&self.retry, attempt);
                tracing::warn!(
                    status = status.as_u16(),
                    delay_ms = delay.as_millis(),
                    attempt,
                    "Transient error, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            if is_transient(status) {
                return Err(AlpacaError::MaxRetriesExceeded { attempts: attempt });
            }

            return Err(api_error(status, path, response).await);
        }
    }
}

/// Decode a successful response, treating an empty body as JSON null.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, AlpacaError> {
    let text = response
        .text()
        .await
        .map_err(|e| AlpacaError::Network(e.to_string()))?;
    let text = if text.is_empty() {
        "null"
    } else {
        text.as_str()
    };
    serde_json::from_str(text).map_err(|e| AlpacaError::JsonParse(e.to_string()))
}

/// Map a non-retryable error response onto the error taxonomy.
async fn api_error(status: StatusCode, path: &str, response: Response) -> AlpacaError {
    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<AlpacaErrorResponse>(&body) {
        Ok(err) => (
            err.code.unwrap_or_else(|| status.as_u16().to_string()),
            err.message,
        ),
        Err(_) => (status.as_u16().to_string(), body),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AlpacaError::AuthenticationFailed,
        StatusCode::NOT_FOUND => AlpacaError::NotFound {
            resource: path.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY => AlpacaError::OrderRejected(message),
        _ => AlpacaError::Api { code, message },
    }
}

/// Statuses worth retrying: request timeout and server-side failures.
const fn is_transient(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 500 | 502 | 503 | 504)
}

/// Backoff before the retry that follows `attempt`, growing by the
/// configured multiplier and capped at `max_backoff`.
fn backoff_for(retry: &RetryConfig, attempt: u32) -> Duration {
    let mut delay = retry.initial_backoff.as_secs_f64();
    for _ in 1..attempt {
        delay *= retry.multiplier;
    }
    Duration::from_secs_f64(delay.min(retry.max_backoff.as_secs_f64()))
}
