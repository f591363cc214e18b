//! # edgar-downloader - Download SEC EDGAR filings to disk
//!
//! edgar-downloader fetches the filings of a company or individual from the SEC's EDGAR
//! (Electronic Data Gathering, Analysis, and Retrieval) system, keeps the ones matching
//! your criteria, and saves them under a predictable folder layout:
//!
//! ```text
//! {download_folder}/sec-edgar-filings/{ticker or CIK}/{form}/{accession number}/
//!     full-index.htm          index page listing every file of the filing
//!     {primary document}      main document, when the filing names one
//!     filing-details.html     headers page, when details are requested
//! ```
//!
//! ## Features
//!
//! - **Rate-limited HTTP gateway** - Complies with SEC.gov fair access rules (10 requests
//!   per second, identified User-Agent), with compressed transfer
//! - **Ticker resolution** - Tickers or CIKs, resolved against the SEC ticker table
//! - **Filing selection** - Form type, amendments, inclusive date window, skip list, limit
//! - **Partial-failure tolerance** - One broken filing does not abort a batch
//! - **Cancellation** - Every wait and request honours a `CancellationToken`
//!
//! ## Basic Usage
//!
//! ```ignore
//! use edgar_downloader::{DownloadOptions, Downloader, DownloaderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The SEC requires a company name and a contact email
//!     let config = DownloaderConfig::new("YourCompany", "contact@example.com")
//!         .with_download_folder("./filings");
//!     let downloader = Downloader::new(config).await?;
//!
//!     // 8-K filings of Microsoft filed in 2022
//!     let options = DownloadOptions::new().with_date_range("2022-01-01", "2022-12-31");
//!     let count = downloader.download("8-K", "MSFT", options).await?;
//!     println!("Downloaded {} filings", count);
//!
//!     Ok(())
//! }
//! ```

mod company;
mod config;
mod core;
mod downloader;
mod error;
mod filings;
mod options;
mod storage;
mod traits;

pub use company::{CIK_LENGTH, TickerMapping, is_cik, pad_cik, resolve_cik};
pub use config::{DownloaderConfig, EdgarUrls};
pub use self::core::Edgar;
pub use downloader::{Downloader, fetch_and_save_filings};
pub use error::{EdgarError, Result};
pub use filings::{
    ACCESSION_NUMBER_DIGITS, FilingRecord, FilingToDownload, FilingsData, RecentFilings,
    Submission, raw_accession_number, select_filings,
};
pub use options::{
    AMENDS_SUFFIX, DATE_FORMAT, DateInput, DownloadOptions, FilingFilter, SUPPORTED_FORMS,
    canonical_form, default_after_date, is_supported_form, parse_date,
};
pub use storage::{FileSystemStorage, ROOT_SAVE_FOLDER_NAME, save_location};
pub use traits::{FilingStorage, RegistryGateway};

// Re-exported so callers do not need a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
