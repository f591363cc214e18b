//! Download sessions and the per-request pipeline.
//!
//! A [`Downloader`] is created once and reused: it owns the rate-limited gateway, the
//! storage backend, and the ticker table fetched at construction. Each call to
//! [`Downloader::download`] resolves the company, fetches its submission history, selects
//! the matching filings, and saves them one after another with
//! [`fetch_and_save_filings`].

use super::company::{TickerMapping, is_cik, resolve_cik};
use super::config::DownloaderConfig;
use super::core::Edgar;
use super::error::{EdgarError, Result};
use super::filings::{FilingToDownload, select_filings};
use super::options::{DownloadOptions, FilingFilter, SUPPORTED_FORMS, canonical_form};
use super::storage::{
    FILING_DETAILS_FILENAME_STEM, FILING_INDEX_FILENAME, FileSystemStorage, save_location,
};
use super::traits::{FilingStorage, RegistryGateway};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Downloads SEC filings into a local folder.
///
/// # Examples
///
/// ```ignore
/// use edgar_downloader::{Downloader, DownloaderConfig, DownloadOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DownloaderConfig::new("MyCompany", "me@example.com");
///     let downloader = Downloader::new(config).await?;
///
///     // Latest 10-K of Apple, amendments included
///     let options = DownloadOptions::new()
///         .with_limit(1)
///         .with_include_amendments(true);
///     let count = downloader.download("10-K", "AAPL", options).await?;
///     println!("Downloaded {} filings", count);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Downloader<G = Edgar, S = FileSystemStorage> {
    gateway: G,
    storage: S,
    download_folder: PathBuf,
    ticker_mapping: TickerMapping,
}

impl Downloader {
    /// Creates a session against SEC EDGAR.
    ///
    /// Builds the gateway, resolves the download folder (current directory when unset,
    /// relative folders made absolute), and fetches the ticker table once. The table is
    /// used for every later request and never refreshed.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the working directory cannot be read, or
    /// the ticker table cannot be fetched or yields no mappings.
    pub async fn new(config: DownloaderConfig) -> Result<Self> {
        let gateway = Edgar::with_config(&config)?;
        let download_folder = resolve_download_folder(config.download_folder.as_deref())?;

        let url = gateway.base_urls.ticker_mapping();
        let ticker_mapping = gateway
            .fetch_ticker_mapping(&url, &CancellationToken::new())
            .await?;
        tracing::debug!("Loaded {} ticker to CIK mappings", ticker_mapping.len());

        Ok(Self::from_parts(
            gateway,
            FileSystemStorage,
            download_folder,
            ticker_mapping,
        ))
    }

    /// Forms accepted by [`Downloader::download`], sorted.
    pub fn supported_forms() -> Vec<&'static str> {
        let mut forms = SUPPORTED_FORMS.to_vec();
        forms.sort_unstable();
        forms
    }
}

impl<G: RegistryGateway, S: FilingStorage> Downloader<G, S> {
    /// Assembles a session from already-built parts.
    pub fn from_parts(
        gateway: G,
        storage: S,
        download_folder: impl Into<PathBuf>,
        ticker_mapping: TickerMapping,
    ) -> Self {
        Self {
            gateway,
            storage,
            download_folder: download_folder.into(),
            ticker_mapping,
        }
    }

    pub fn download_folder(&self) -> &Path {
        &self.download_folder
    }

    pub fn ticker_mapping(&self) -> &TickerMapping {
        &self.ticker_mapping
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Downloads the filings of `form` for a ticker or CIK and returns how many were
    /// saved.
    ///
    /// A filing counts as saved once its index page is on disk; the primary document and
    /// the details page are best effort.
    ///
    /// # Errors
    ///
    /// * `EdgarError::UnsupportedForm` - `form` is not in [`SUPPORTED_FORMS`]
    /// * `EdgarError::InvalidIdentifier` / `EdgarError::UnknownSymbol` - the company
    ///   cannot be resolved
    /// * `EdgarError::InvalidDate` - a date bound is malformed
    /// * Any error of [`fetch_and_save_filings`]
    pub async fn download(
        &self,
        form: &str,
        ticker_or_cik: &str,
        options: DownloadOptions,
    ) -> Result<usize> {
        self.download_with_cancellation(form, ticker_or_cik, options, &CancellationToken::new())
            .await
    }

    /// Same as [`Downloader::download`], abandoned with `EdgarError::Cancelled` as soon as
    /// `cancel` fires. Documents saved before that stay on disk.
    pub async fn download_with_cancellation(
        &self,
        form: &str,
        ticker_or_cik: &str,
        options: DownloadOptions,
        cancel: &CancellationToken,
    ) -> Result<usize> {
        let form =
            canonical_form(form).ok_or_else(|| EdgarError::UnsupportedForm(form.to_string()))?;

        let cik = resolve_cik(ticker_or_cik, &self.ticker_mapping)?;
        let ticker_or_cik = ticker_or_cik.trim();
        let ticker = (!is_cik(ticker_or_cik)).then(|| ticker_or_cik.to_uppercase());

        let filter =
            FilingFilter::from_options(form, &cik, ticker, options, &self.download_folder)?;

        fetch_and_save_filings(&self.gateway, &self.storage, &filter, cancel).await
    }
}

fn resolve_download_folder(folder: Option<&Path>) -> Result<PathBuf> {
    match folder {
        Some(folder) => Ok(std::path::absolute(folder)?),
        None => Ok(std::env::current_dir()?),
    }
}

/// Fetches the submission history of `filter.cik`, selects the requested filings, and
/// saves each of them.
///
/// Filings are processed one at a time, so every request goes through the gateway's
/// rate limiter in order. For each filing:
///
/// 1. The index page is fetched and saved. If either step fails the filing is skipped.
/// 2. The primary document, if any, is fetched and saved. Failures are logged.
/// 3. With `download_details`, the details page, if any, is fetched and saved. Failures
///    are logged.
///
/// Returns the number of filings whose index page was saved.
///
/// # Errors
///
/// Fetching the history and selecting filings are fatal: their errors are returned
/// unchanged and nothing is downloaded. `EdgarError::Cancelled` is returned whenever it
/// occurs. Every other per-filing failure only lowers the returned count.
pub async fn fetch_and_save_filings<G, S>(
    gateway: &G,
    storage: &S,
    filter: &FilingFilter,
    cancel: &CancellationToken,
) -> Result<usize>
where
    G: RegistryGateway + ?Sized,
    S: FilingStorage + ?Sized,
{
    let urls = gateway.base_urls();
    let history = gateway
        .fetch_filing_history(&urls.submissions(&filter.cik), cancel)
        .await?;
    let to_download = select_filings(&history, filter, urls)?;

    tracing::info!(
        "Found {} {} filings for {}",
        to_download.len(),
        filter.form,
        filter.company_identifier()
    );

    let mut download_count = 0;
    for filing in &to_download {
        let index_path = filing_path(filter, filing, FILING_INDEX_FILENAME);
        let saved = fetch_and_save(gateway, storage, &filing.raw_filing_uri, &index_path, cancel).await;
        if !tolerate(saved, "index", filing)? {
            continue;
        }

        if let (Some(uri), Some(filename)) =
            (filing.primary_doc_uri.as_deref(), filing.primary_doc_filename())
        {
            let path = filing_path(filter, filing, filename);
            let saved = fetch_and_save(gateway, storage, uri, &path, cancel).await;
            tolerate(saved, "primary document", filing)?;
        }

        if filter.download_details {
            if let (Some(uri), Some(suffix)) = (
                filing.details_doc_uri(urls, &filter.cik),
                filing.details_doc_suffix.as_deref(),
            ) {
                let filename = format!("{}{}", FILING_DETAILS_FILENAME_STEM, suffix);
                let path = filing_path(filter, filing, &filename);
                let saved = fetch_and_save(gateway, storage, &uri, &path, cancel).await;
                tolerate(saved, "details", filing)?;
            }
        }

        download_count += 1;
    }

    tracing::info!(
        "Downloaded {} of {} {} filings for {}",
        download_count,
        to_download.len(),
        filter.form,
        filter.company_identifier()
    );

    Ok(download_count)
}

fn filing_path(filter: &FilingFilter, filing: &FilingToDownload, filename: &str) -> PathBuf {
    save_location(
        &filter.download_folder,
        filter.company_identifier(),
        &filter.form,
        &filing.accession_number,
        filename,
    )
}

async fn fetch_and_save<G, S>(
    gateway: &G,
    storage: &S,
    url: &str,
    path: &Path,
    cancel: &CancellationToken,
) -> Result<()>
where
    G: RegistryGateway + ?Sized,
    S: FilingStorage + ?Sized,
{
    let contents = gateway.fetch_bytes(url, cancel).await?;
    storage.save(path, &contents).await
}

/// Turns a per-document failure into `Ok(false)`; cancellation still propagates.
fn tolerate(result: Result<()>, document: &str, filing: &FilingToDownload) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(EdgarError::Cancelled) => Err(EdgarError::Cancelled),
        Err(err) => {
            tracing::warn!(
                "Failed to download {} of filing {}: {}",
                document,
                filing.accession_number,
                err
            );
            Ok(false)
        }
    }
}
