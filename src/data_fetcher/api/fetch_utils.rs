//! Generic HTTP fetching with response caching and error classification

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use crate::data_fetcher::cache::{CachePolicy, ResponseCache};
use crate::error::AppError;

/// Fetches and parses JSON from `url`, consulting `cache` first.
///
/// - Cached bodies that no longer parse are ignored and refetched
/// - Non-success status codes map to specific `AppError` variants
/// - Only parsable, non-empty payloads are cached, as `policy` allows
///
/// There is no retry: a failed request is reported to the caller as is.
#[instrument(skip(client, cache))]
pub(super) async fn fetch<T: DeserializeOwned>(
    client: &Client,
    cache: &ResponseCache,
    url: &str,
    policy: CachePolicy,
) -> Result<T, AppError> {
    if let Some(cached_response) = cache.get(url).await {
        debug!("Using cached HTTP response for URL: {url}");
        match serde_json::from_str::<T>(&cached_response) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => {
                warn!("Failed to parse cached response for URL {}: {}", url, e);
            }
        }
    }

    info!("Fetching data from URL: {url}");

    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return if e.is_timeout() {
                Err(AppError::network_timeout(url))
            } else if e.is_connect() {
                Err(AppError::network_connection(url, e.to_string()))
            } else {
                Err(AppError::ApiFetch(e))
            };
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        // 404 is how the provider reports an empty result set
        if status_code == 404 {
            debug!("HTTP 404 (URL: {})", url);
        } else {
            error!("HTTP {} - {} (URL: {})", status_code, reason, url);
        }

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    match serde_json::from_str::<T>(&response_text) {
        Ok(parsed) => {
            if is_empty_listing(&response_text) {
                debug!("Not caching empty response from {}", url);
            } else {
                match policy {
                    CachePolicy::NoStore => debug!("Not caching response from {}", url),
                    CachePolicy::Expires(ttl) => {
                        cache.put(url.to_string(), response_text, Some(ttl)).await
                    }
                    CachePolicy::Permanent => cache.put(url.to_string(), response_text, None).await,
                }
            }
            Ok(parsed)
        }
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &response_text.chars().take(200).collect::<String>()
            );

            if response_text.trim().is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !response_text.trim_start().starts_with('{')
                && !response_text.trim_start().starts_with('[')
            {
                Err(AppError::api_malformed_json(
                    "Response is not valid JSON",
                    url,
                ))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}

fn is_empty_listing(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.starts_with('[') && trimmed[1..].trim_start().starts_with(']')
}
