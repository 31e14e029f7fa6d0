use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::warn;

pub(crate) fn client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build http client")
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(300) {
        Some((i, _)) => &body[..i],
        None => body,
    }
}

/// Sends `request` and decodes a JSON body. Timeouts, transport errors and
/// non-2xx statuses become errors carrying the provider name.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &str,
    timeout_secs: u64,
) -> Result<T> {
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            warn!(provider, timeout_secs, "provider request timed out");
            bail!("{provider} request timed out after {timeout_secs}s");
        },
        Err(e) => {
            warn!(provider, "provider request failed: {}", e);
            return Err(e).with_context(|| format!("{provider} request failed"));
        },
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(provider, status = %status, "provider returned non-success: {}", preview(&body));
        bail!("{provider} error {status}: {}", preview(&body));
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("failed to parse {provider} response"))
}
