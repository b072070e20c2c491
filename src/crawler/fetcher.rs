//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building the HTTP client with the configured timeout
//! - GET requests that read the full body
//! - Transparent gzip decoding with a raw-body fallback
//! - Error classification

use flate2::read::GzDecoder;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::Client;
use std::io::Read;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Body bytes, gzip-decoded when the response declared gzip
        body: Vec<u8>,
    },

    /// Response status was 400 or above
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure: connection, timeout, or body read
    NetworkError {
        /// Error description
        error: String,
        /// Whether the configured timeout elapsed
        timed_out: bool,
    },
}

impl FetchResult {
    /// Returns true if the content type declares an HTML document
    ///
    /// Matches `text/html` anywhere in the header, ignoring parameters.
    pub fn is_document(content_type: &str) -> bool {
        content_type.to_ascii_lowercase().contains("text/html")
    }
}

/// Builds an HTTP client for mirroring
///
/// The client sends no custom headers or cookies and keeps the default
/// redirect policy. Automatic gzip handling is turned off so the fetcher can
/// fall back to the raw body when decompression fails.
///
/// # Arguments
///
/// * `timeout` - The per-request timeout
///
/// # Example
///
/// ```no_run
/// use site_mirror::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .gzip(false)
        .brotli(true)
        .build()
}

/// Fetches a URL and reads its whole body
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Status >= 400 | `HttpError` |
/// | Timeout | `NetworkError { timed_out: true }` |
/// | Connect/other transport failure | `NetworkError` |
/// | Body read failure | `NetworkError` |
/// | Gzip decode failure | `Success` with the raw body (logged) |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(r) => r,
        Err(e) => return network_error(e),
    };

    let status = response.status();
    if status.as_u16() >= 400 {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = header_value(&response, CONTENT_TYPE);
    let content_encoding = header_value(&response, CONTENT_ENCODING);

    let raw = match response.bytes().await {
        Ok(b) => b.to_vec(),
        Err(e) => return network_error(e),
    };

    let body = if is_gzip(&content_encoding) {
        decode_gzip_or_raw(raw, url)
    } else {
        raw
    };

    FetchResult::Success {
        status_code: status.as_u16(),
        content_type,
        body,
    }
}

/// Decompresses a gzip body, returning the raw bytes if that fails
pub fn decode_gzip_or_raw(raw: Vec<u8>, url: &Url) -> Vec<u8> {
    let mut decoded = Vec::new();
    match GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded) {
        Ok(_) => decoded,
        Err(e) => {
            tracing::warn!(url = %url, "gzip decode failed, keeping raw body: {}", e);
            raw
        }
    }
}

fn is_gzip(content_encoding: &str) -> bool {
    content_encoding
        .split(',')
        .any(|enc| enc.trim().eq_ignore_ascii_case("gzip"))
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn network_error(e: reqwest::Error) -> FetchResult {
    FetchResult::NetworkError {
        timed_out: e.is_timeout(),
        error: e.to_string(),
    }
}
