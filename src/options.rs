use super::error::{EdgarError, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Date format accepted for literal date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Suffix EDGAR appends to the form type of an amendment, e.g. `10-K/A`.
pub const AMENDS_SUFFIX: &str = "/A";

/// Earliest filing date on EDGAR full-text records; the default lower bound.
pub fn default_after_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1994, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Forms the downloader knows how to fetch.
pub const SUPPORTED_FORMS: &[&str] = &[
    "1", "1-A", "1-A POS", "1-A-W", "1-E", "1-E AD", "1-K", "1-SA", "1-U", "1-Z", "1-Z-W",
    "10-12B", "10-12G", "10-D", "10-K", "10-K405", "10-KT", "10-Q", "10-QT", "11-K",
    "11-KT", "13F-HR", "13F-NT", "13FCONP", "144", "15-12B", "15-12G", "15-15D", "15F-12B",
    "15F-12G", "15F-15D", "18-K", "20-F", "20FR12B", "20FR12G", "24F-2NT", "25", "25-NSE",
    "253G2", "3", "4", "40-17F2", "40-17G", "40-F", "424B1", "424B2", "424B3", "424B4",
    "424B5", "424B7", "424B8", "485APOS", "485BPOS", "485BXT", "497", "497AD", "497J",
    "497K", "5", "6-K", "8-A12B", "8-A12G", "8-K", "8-K12B", "8-K12G3", "8-K15D5", "ABS-15G",
    "ABS-EE", "ARS", "CORRESP", "D", "DEF 14A", "DEF 14C", "DEFA14A", "DEFM14A", "DEFR14A",
    "DRS", "DRSLTR", "EFFECT", "F-1", "F-10", "F-3", "F-4", "F-6", "FWP", "N-1A", "N-2",
    "N-30B-2", "N-30D", "N-CEN", "N-CSR", "N-CSRS", "N-MFP", "N-MFP2", "N-PX", "N-Q",
    "NPORT-EX", "NPORT-P", "NT 10-K", "NT 10-Q", "NT 20-F", "POS AM", "POS EX", "PRE 14A",
    "PRE 14C", "PREM14A", "PX14A6G", "S-1", "S-11", "S-3", "S-3ASR", "S-4", "S-8",
    "S-8 POS", "SC 13D", "SC 13E3", "SC 13G", "SC 14D9", "SC TO-C", "SC TO-I", "SC TO-T",
    "SD", "SF-1", "SF-3", "UPLOAD", "X-17A-5",
];

/// Returns the [`SUPPORTED_FORMS`] spelling of `form`, ignoring case and surrounding
/// space.
pub fn canonical_form(form: &str) -> Option<&'static str> {
    let form = form.trim();
    SUPPORTED_FORMS
        .iter()
        .copied()
        .find(|f| f.eq_ignore_ascii_case(form))
}

pub fn is_supported_form(form: &str) -> bool {
    canonical_form(form).is_some()
}

/// A date bound as supplied by the caller.
///
/// Literals must be `YYYY-MM-DD`; anything else is rejected rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Literal(String),
    Date(NaiveDate),
}

impl DateInput {
    /// Resolves the input to a calendar date.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::InvalidDate` if a literal is not in `YYYY-MM-DD` form.
    pub fn resolve(&self) -> Result<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Literal(text) => parse_date(text),
        }
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Literal(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Literal(text)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(instant: DateTime<Tz>) -> Self {
        DateInput::Date(instant.date_naive())
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// chrono accepts a missing zero padding (`2024-3-1`), which EDGAR never emits, so the
/// length is checked as well.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    if text.len() != 10 {
        return Err(EdgarError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| EdgarError::InvalidDate(format!("{}: {}", text, e)))
}

/// Options for a download request
///
/// Every field has a documented default, so `DownloadOptions::new()` downloads the whole
/// available history of a form:
///
/// | field | default |
/// |---|---|
/// | `limit` | `None` (unbounded) |
/// | `after` | 1994-01-01 |
/// | `before` | today |
/// | `include_amendments` | `false` |
/// | `download_details` | `false` |
/// | `accession_numbers_to_skip` | empty |
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub limit: Option<usize>,
    pub after: Option<DateInput>,
    pub before: Option<DateInput>,
    /// Whether to also match amendment forms (e.g., 10-K/A when 10-K is requested).
    pub include_amendments: bool,
    /// Whether to download the filing details page next to the index.
    pub download_details: bool,
    pub accession_numbers_to_skip: HashSet<String>,
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of filings. Zero means no cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn with_after(mut self, after: impl Into<DateInput>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_before(mut self, before: impl Into<DateInput>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn with_date_range(self, after: impl Into<DateInput>, before: impl Into<DateInput>) -> Self {
        self.with_after(after).with_before(before)
    }

    /// Set whether to include amendment forms.
    ///
    /// When true, requesting "10-K" will also include "10-K/A" filings.
    /// When false (default), only the exact form type specified will be returned.
    pub fn with_include_amendments(mut self, include_amendments: bool) -> Self {
        self.include_amendments = include_amendments;
        self
    }

    pub fn with_download_details(mut self, download_details: bool) -> Self {
        self.download_details = download_details;
        self
    }

    pub fn with_accession_numbers_to_skip<I, S>(mut self, accession_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accession_numbers_to_skip = accession_numbers.into_iter().map(Into::into).collect();
        self
    }
}

/// Fully resolved request: what to match and where it is saved.
///
/// Built once per download from [`DownloadOptions`] and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingFilter {
    pub form: String,
    pub cik: String,
    /// Upper-cased ticker when the request named one; used for the save folder.
    pub ticker: Option<String>,
    pub limit: usize,
    pub after: NaiveDate,
    pub before: NaiveDate,
    pub include_amendments: bool,
    pub download_details: bool,
    pub accession_numbers_to_skip: HashSet<String>,
    pub download_folder: PathBuf,
}

impl FilingFilter {
    /// Resolves `options` for a form and CIK.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::InvalidDate` if a date bound is malformed.
    pub fn from_options(
        form: &str,
        cik: &str,
        ticker: Option<String>,
        options: DownloadOptions,
        download_folder: &Path,
    ) -> Result<Self> {
        let after = match &options.after {
            Some(after) => after.resolve()?,
            None => default_after_date(),
        };
        let before = match &options.before {
            Some(before) => before.resolve()?,
            None => Local::now().date_naive(),
        };

        Ok(Self {
            form: form.trim().to_string(),
            cik: cik.to_string(),
            ticker,
            limit: options.limit.unwrap_or(usize::MAX),
            after,
            before,
            include_amendments: options.include_amendments,
            download_details: options.download_details,
            accession_numbers_to_skip: options.accession_numbers_to_skip,
            download_folder: download_folder.to_path_buf(),
        })
    }

    /// Folder name of the company: the ticker if one was given, else the CIK.
    pub fn company_identifier(&self) -> &str {
        self.ticker.as_deref().unwrap_or(&self.cik)
    }

    /// True if a filing of form `form` is requested.
    pub fn matches_form(&self, form: &str) -> bool {
        let form = form.trim().to_uppercase();
        let wanted = self.form.to_uppercase();
        form == wanted || (self.include_amendments && form == format!("{}{}", wanted, AMENDS_SUFFIX))
    }

    /// True if `date` lies in `[after, before]`.
    pub fn within_date_range(&self, date: NaiveDate) -> bool {
        self.after <= date && date <= self.before
    }
}
