use super::error::Result;
use super::traits::FilingStorage;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Folder created under the download folder to hold every saved filing.
pub const ROOT_SAVE_FOLDER_NAME: &str = "sec-edgar-filings";

/// Name the index page is saved under.
pub const FILING_INDEX_FILENAME: &str = "full-index.htm";

/// Stem of the name the details page is saved under; the details suffix is appended.
pub const FILING_DETAILS_FILENAME_STEM: &str = "filing-details";

/// Returns where a document of a filing is saved:
/// `{root}/sec-edgar-filings/{company}/{form}/{accession_number}/{filename}`.
///
/// Pure path arithmetic; nothing is created.
///
/// ```rust
/// use edgar_downloader::save_location;
/// use std::path::Path;
/// let path = save_location(Path::new("/data"), "AAPL", "10-K", "0000320193-22-000001", "full-index.htm");
/// assert_eq!(path, Path::new("/data/sec-edgar-filings/AAPL/10-K/0000320193-22-000001/full-index.htm"));
/// ```
pub fn save_location(
    root: &Path,
    company_identifier: &str,
    form: &str,
    accession_number: &str,
    filename: &str,
) -> PathBuf {
    root.join(ROOT_SAVE_FOLDER_NAME)
        .join(company_identifier)
        .join(form)
        .join(accession_number)
        .join(filename)
}

/// Saves documents to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemStorage;

#[async_trait]
impl FilingStorage for FileSystemStorage {
    async fn save(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        tracing::debug!("Saved {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}
