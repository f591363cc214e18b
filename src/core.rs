use async_trait::async_trait;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, HeaderMap, HeaderValue, USER_AGENT};
use std::io::Read;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::config::{DownloaderConfig, EdgarUrls};
use super::error::{EdgarError, Result};
use super::traits::RegistryGateway;

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone)]
pub struct Edgar {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter for SEC compliance
    pub(crate) rate_limiter: Arc<Governor>,

    /// Base URLs for the EDGAR services
    pub(crate) base_urls: EdgarUrls,
}

/// Rate-limited HTTP gateway to the SEC EDGAR system.
///
/// `Edgar` is the only component that talks to the network. Every request carries the
/// identification header the SEC requires (`"<company> <email>"`), asks for compressed
/// transfer, and is paced by a shared token bucket.
///
/// # Rate Limiting
///
/// The SEC limits automated clients to 10 requests per second. The bucket here holds a
/// single token, so requests are strictly serialized at the configured rate and no burst
/// is ever sent:
///
/// ```text
/// Token Bucket (capacity: 1 token)
/// ┌───┐
/// │ █ │  ← refills every 1/rate seconds
/// └───┘
///   ↓ consume on request
/// ```
///
/// Clones share the same bucket, so handing a clone to another task does not double the
/// request budget.
///
/// # Error Handling
///
/// Any non-success status is reported as `EdgarError::RemoteError` and is not retried.
/// Waiting for a token and the request itself both observe the caller's
/// `CancellationToken`; a cancelled wait yields `EdgarError::Cancelled`.
///
/// # Examples
///
/// ```rust
/// # use edgar_downloader::{DownloaderConfig, Edgar};
/// let config = DownloaderConfig::new("MyCompany", "me@example.com");
/// let edgar = Edgar::with_config(&config)?;
/// # Ok::<(), edgar_downloader::EdgarError>(())
/// ```
impl Edgar {
    /// Creates a gateway with the SEC defaults (10 requests/second, 30 second timeout).
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if the company name or email is blank or cannot be
    /// sent as a header value.
    pub fn new(company_name: &str, email_address: &str) -> Result<Self> {
        Self::with_config(&DownloaderConfig::new(company_name, email_address))
    }

    /// Creates a gateway from an explicit configuration.
    ///
    /// Use this to change the rate, the timeout, or to point the base URLs at a mock
    /// server.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if the identification is blank or malformed, the
    /// rate limit is zero, or the HTTP client cannot be built.
    pub fn with_config(config: &DownloaderConfig) -> Result<Self> {
        if config.company_name.trim().is_empty() || config.email_address.trim().is_empty() {
            return Err(EdgarError::ConfigError(
                "Company name and email address are required by SEC fair access rules"
                    .to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent())
                .map_err(|e| EdgarError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| EdgarError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let rate = NonZeroU32::new(config.rate_limit).ok_or_else(|| {
            EdgarError::ConfigError("Rate limit must be greater than zero".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(
            Quota::per_second(rate).allow_burst(NonZeroU32::MIN),
        ));

        Ok(Edgar {
            client,
            rate_limiter,
            base_urls: config.base_urls.clone(),
        })
    }

    /// Fetches a URL and returns its decompressed body.
    ///
    /// Waits for a rate limiter token first. Both the wait and the request are abandoned
    /// as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// * `EdgarError::Cancelled` - `cancel` fired before the body was read
    /// * `EdgarError::RemoteError` - The server answered with a non-success status
    /// * `EdgarError::RequestError` - Network failure or timeout
    /// * `EdgarError::DecodeError` - The body claimed a compression it does not have
    pub async fn get_bytes(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EdgarError::Cancelled),
            _ = self.rate_limiter.until_ready() => {}
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EdgarError::Cancelled),
            result = self.send(url) => result,
        }
    }

    async fn send(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EdgarError::RemoteError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|val| val.to_str().ok())
            .map(|val| val.to_ascii_lowercase());
        let body = response.bytes().await?;

        decode_body(encoding.as_deref(), &body)
    }

    /// Returns the base URL for EDGAR archives.
    pub fn archives_url(&self) -> &str {
        &self.base_urls.archives
    }

    /// Returns the base URL for EDGAR data.
    pub fn data_url(&self) -> &str {
        &self.base_urls.data
    }

    /// Returns the base URL for EDGAR files.
    pub fn files_url(&self) -> &str {
        &self.base_urls.files
    }
}

#[async_trait]
impl RegistryGateway for Edgar {
    async fn fetch_bytes(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        self.get_bytes(url, cancel).await
    }

    fn base_urls(&self) -> &EdgarUrls {
        &self.base_urls
    }
}

/// Undoes the transfer encoding named by a `Content-Encoding` header.
///
/// Servers disagree on what "deflate" means, so a zlib stream is tried first and a raw
/// deflate stream second.
fn decode_body(encoding: Option<&str>, body: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    match encoding {
        Some(enc) if enc.contains("gzip") => {
            GzDecoder::new(body)
                .read_to_end(&mut decoded)
                .map_err(|e| EdgarError::DecodeError(format!("Invalid gzip body: {}", e)))?;
        }
        Some(enc) if enc.contains("deflate") => {
            if ZlibDecoder::new(body).read_to_end(&mut decoded).is_err() {
                decoded.clear();
                DeflateDecoder::new(body)
                    .read_to_end(&mut decoded)
                    .map_err(|e| EdgarError::DecodeError(format!("Invalid deflate body: {}", e)))?;
            }
        }
        _ => decoded.extend_from_slice(body),
    }
    Ok(decoded)
}
