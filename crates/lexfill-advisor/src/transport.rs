//! HTTP plumbing shared by the network providers

use crate::AdvisorError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Build an HTTP client with the given request timeout
pub(crate) fn client(timeout_secs: u64) -> Result<reqwest::Client, AdvisorError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AdvisorError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// POST `body` as JSON and decode the reply, retrying transient failures
///
/// Transport errors, 429 and 5xx responses are retried with exponential
/// backoff (1s, 2s, 4s, ...). 404 maps to `ModelNotAvailable`, 401/403 to
/// `Config`; any other status fails immediately.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &B,
    model: &str,
    max_retries: u32,
) -> Result<R, AdvisorError>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        let mut request = client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<R>().await.map_err(|e| {
                        AdvisorError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                }
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(AdvisorError::ModelNotAvailable(model.to_string()));
                }
                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(AdvisorError::Config(format!("Credentials rejected (HTTP {})", status)));
                }

                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    last_error = Some(AdvisorError::RateLimitExceeded);
                } else if status.is_server_error() {
                    last_error = Some(AdvisorError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                } else {
                    return Err(AdvisorError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
            }
            Err(e) => {
                last_error = Some(AdvisorError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = Duration::from_secs(2u64.pow(attempts - 1));
            debug!(url, attempts, ?delay, "retrying advisor request");
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| AdvisorError::Communication("Max retries exceeded".to_string())))
}

/// Drive an async provider call to completion from synchronous code
pub(crate) fn block_on<F, T>(future: F) -> Result<T, AdvisorError>
where
    F: Future<Output = Result<T, AdvisorError>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AdvisorError::Other(format!("Failed to start runtime: {}", e)))?
        .block_on(future)
}
