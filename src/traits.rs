use super::company::TickerMapping;
use super::config::EdgarUrls;
use super::error::Result;
use super::filings::Submission;
use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// The network boundary between the downloader and EDGAR.
///
/// Every request that leaves the process goes through `fetch_bytes`, which is where
/// rate limiting, identification headers, and decompression live. The typed fetches
/// are layered on top of it, so an implementation only has to move bytes.
///
/// Failures are terminal for the request that produced them. Nothing here retries;
/// the orchestrator decides which failures a batch can absorb.
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// Fetches the raw (decompressed) body of `url`.
    async fn fetch_bytes(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>>;

    /// Base URLs used to build submission and archive links.
    fn base_urls(&self) -> &EdgarUrls;

    /// Fetches and decodes a company's submission history.
    async fn fetch_filing_history(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Submission> {
        let body = self.fetch_bytes(url, cancel).await?;
        Ok(serde_json::from_slice::<Submission>(&body)?)
    }

    /// Fetches the ticker table and builds the ticker → zero-padded CIK map.
    async fn fetch_ticker_mapping(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<TickerMapping> {
        let body = self.fetch_bytes(url, cancel).await?;
        TickerMapping::from_json_slice(&body)
    }
}

/// Persists downloaded documents.
#[async_trait]
pub trait FilingStorage: Send + Sync {
    /// Writes `contents` to `path`, creating parent directories as needed.
    async fn save(&self, path: &Path, contents: &[u8]) -> Result<()>;
}
