//! Shared HTTP plumbing for the scraping and CSV providers.

use std::time::Duration;

use log::debug;
use reqwest::{header, Client, StatusCode};

use crate::errors::MarketDataError;

/// Default HTTP request timeout
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Some sources refuse requests that do not look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/54.0.2840.99 Safari/537.36";

/// Build the client every provider uses.
pub(crate) fn build_client() -> Client {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::EXPIRES, header::HeaderValue::from_static("-1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        header::HeaderValue::from_static("1"),
    );

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` and return the body text.
///
/// `log_url` is what gets logged, so callers can mask credentials.
pub(crate) async fn fetch_text(
    client: &Client,
    provider: &str,
    url: &str,
    log_url: &str,
) -> Result<String, MarketDataError> {
    debug!("Calling {}", log_url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MarketDataError::provider(provider, e.to_string()))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        return Err(MarketDataError::provider(
            provider,
            format!("HTTP error: {}", status),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| MarketDataError::provider(provider, e.to_string()))
}

/// Replace every character of a credential with `*` for logging.
pub(crate) fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}
