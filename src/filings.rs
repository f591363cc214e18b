use super::config::EdgarUrls;
use super::error::{EdgarError, Result};
use super::options::{FilingFilter, parse_date};
use serde::Deserialize;

/// Number of digits in an accession number once the hyphens are removed.
pub const ACCESSION_NUMBER_DIGITS: usize = 18;

/// Name of the page, next to the accession number, that lists every file of a filing.
pub const INDEX_DOC_SUFFIX: &str = "-index.htm";

/// Name of the page, next to the accession number, with the filing's SGML headers.
pub const DETAILS_DOC_SUFFIX: &str = "-index-headers";

/// Submission history of a company or individual, as served by
/// `data.sec.gov/submissions/CIK##########.json`.
///
/// Only the parts the downloader reads are modelled; unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub cik: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

/// Column-oriented table of recent filings. Row `i` is made of element `i` of every
/// column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentFilings {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate", default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(rename = "primaryDocument", default)]
    pub primary_document: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

/// One row of [`RecentFilings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilingRecord<'a> {
    pub accession_number: &'a str,
    pub filing_date: &'a str,
    pub form: &'a str,
    pub primary_document: &'a str,
    pub items: &'a str,
}

impl RecentFilings {
    fn get_str_at(column: &[String], idx: usize) -> &str {
        column.get(idx).map(String::as_str).unwrap_or_default()
    }

    /// Iterates over the rows in registry order (newest first).
    ///
    /// The accession number column drives the row count; a shorter column yields empty
    /// strings for the missing cells.
    pub fn records(&self) -> impl Iterator<Item = FilingRecord<'_>> {
        self.accession_number
            .iter()
            .enumerate()
            .map(|(idx, accession_number)| FilingRecord {
                accession_number: accession_number.as_str(),
                filing_date: Self::get_str_at(&self.filing_date, idx),
                form: Self::get_str_at(&self.form, idx),
                primary_document: Self::get_str_at(&self.primary_document, idx),
                items: Self::get_str_at(&self.items, idx),
            })
    }

    pub fn len(&self) -> usize {
        self.accession_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accession_number.is_empty()
    }
}

/// Removes the hyphens from an accession number and checks the result is 18 digits.
///
/// # Errors
///
/// Returns `EdgarError::MalformedIdentifier` for anything else.
///
/// ```rust
/// use edgar_downloader::raw_accession_number;
/// assert_eq!(raw_accession_number("0000320193-24-000123")?, "000032019324000123");
/// assert!(raw_accession_number("abc").is_err());
/// # Ok::<(), edgar_downloader::EdgarError>(())
/// ```
pub fn raw_accession_number(accession_number: &str) -> Result<String> {
    let raw = accession_number.replace('-', "");
    if raw.len() != ACCESSION_NUMBER_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EdgarError::MalformedIdentifier(accession_number.to_string()));
    }
    Ok(raw)
}

/// A matched filing and the URLs needed to download it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingToDownload {
    /// Index page listing every document of the filing.
    pub raw_filing_uri: String,
    /// Main document, if the filing names one.
    pub primary_doc_uri: Option<String>,
    pub accession_number: String,
    /// Extension of the details page, if the primary document has one it can be
    /// rendered next to.
    pub details_doc_suffix: Option<String>,
}

impl FilingToDownload {
    /// Builds the download URLs of one filing. Pure string work; no I/O.
    ///
    /// * index: `{archives}/data/{cik}/{raw accession}/{accession}-index.htm`
    /// * primary: `{archives}/data/{cik}/{raw accession}/{primary_document}`
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::MalformedIdentifier` if the accession number is not 18 digits
    /// once the hyphens are removed.
    pub fn new(
        urls: &EdgarUrls,
        cik: &str,
        accession_number: &str,
        primary_document: &str,
    ) -> Result<Self> {
        let raw_accession = raw_accession_number(accession_number)?;

        let raw_filing_uri = urls.filing_document(
            cik,
            &raw_accession,
            &format!("{}{}", accession_number, INDEX_DOC_SUFFIX),
        );

        let primary_document = primary_document.trim();
        let primary_doc_uri = (!primary_document.is_empty())
            .then(|| urls.filing_document(cik, &raw_accession, primary_document));

        Ok(Self {
            raw_filing_uri,
            primary_doc_uri,
            accession_number: accession_number.to_string(),
            details_doc_suffix: details_doc_suffix(primary_document),
        })
    }

    /// Filename of the primary document, taken from its URL.
    pub fn primary_doc_filename(&self) -> Option<&str> {
        self.primary_doc_uri
            .as_deref()
            .and_then(|uri| uri.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }

    /// URL of the details page, when the filing has one.
    pub fn details_doc_uri(&self, urls: &EdgarUrls, cik: &str) -> Option<String> {
        let suffix = self.details_doc_suffix.as_deref()?;
        let raw_accession = raw_accession_number(&self.accession_number).ok()?;
        Some(urls.filing_document(
            cik,
            &raw_accession,
            &format!("{}{}{}", self.accession_number, DETAILS_DOC_SUFFIX, suffix),
        ))
    }
}

/// Derives the details page extension from the primary document's extension.
///
/// EDGAR only renders a headers page as `.html`, so both `.htm` and `.html` primary
/// documents map to `.html`. Other documents (XML ownership forms, plain text) have no
/// details page.
fn details_doc_suffix(primary_document: &str) -> Option<String> {
    let (_, extension) = primary_document.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "htm" | "html" => Some(".html".to_string()),
        _ => None,
    }
}

/// Selects the filings of `history` that `filter` asks for, in registry order.
///
/// A row is kept when its form matches (amendments only if requested), its filing date
/// lies inside the inclusive date window, and its accession number is not on the skip
/// list. Selection stops once `filter.limit` filings are collected. Rows with an
/// unparseable filing date are skipped.
///
/// # Errors
///
/// Returns `EdgarError::MalformedIdentifier` if a selected row carries an accession
/// number that is not 18 digits.
pub fn select_filings(
    history: &Submission,
    filter: &FilingFilter,
    urls: &EdgarUrls,
) -> Result<Vec<FilingToDownload>> {
    let mut to_download = Vec::new();

    for record in history.filings.recent.records() {
        if to_download.len() >= filter.limit {
            break;
        }

        if !filter.matches_form(record.form) {
            continue;
        }

        let filing_date = match parse_date(record.filing_date) {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(
                    "Skipping filing {} with unparseable date: {}",
                    record.accession_number,
                    err
                );
                continue;
            }
        };

        if !filter.within_date_range(filing_date) {
            continue;
        }

        if filter
            .accession_numbers_to_skip
            .contains(record.accession_number)
        {
            continue;
        }

        to_download.push(FilingToDownload::new(
            urls,
            &filter.cik,
            record.accession_number,
            record.primary_document,
        )?);
    }

    Ok(to_download)
}
