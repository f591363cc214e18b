use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the downloader session
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Organization name sent in the User-Agent header
    pub company_name: String,
    /// Contact address sent in the User-Agent header
    pub email_address: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Folder under which filings are saved. `None` means the current working directory.
    pub download_folder: Option<PathBuf>,
    /// Base URLs for different EDGAR services
    pub base_urls: EdgarUrls,
}

/// Base URLs for different EDGAR services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgarUrls {
    /// Base URL for EDGAR archives
    pub archives: String,
    /// Base URL for EDGAR data
    pub data: String,
    /// Base URL for EDGAR files
    pub files: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            company_name: "edgar_downloader".to_string(),
            email_address: "contact@example.com".to_string(),
            rate_limit: 10,
            timeout: Duration::from_secs(30),
            download_folder: None,
            base_urls: EdgarUrls::default(),
        }
    }
}

impl DownloaderConfig {
    /// Creates a config with the SEC defaults and the given identification.
    ///
    /// The SEC requires every automated client to identify itself with an
    /// organization name and a contact email address.
    ///
    /// ```rust
    /// use edgar_downloader::DownloaderConfig;
    /// let config = DownloaderConfig::new("MyCompany", "me@example.com");
    /// assert_eq!(config.user_agent(), "MyCompany me@example.com");
    /// ```
    pub fn new(company_name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            email_address: email_address.into(),
            ..Self::default()
        }
    }

    pub fn with_download_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.download_folder = Some(folder.into());
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_urls(mut self, base_urls: EdgarUrls) -> Self {
        self.base_urls = base_urls;
        self
    }

    /// The identification string sent with every request.
    pub fn user_agent(&self) -> String {
        format!("{} {}", self.company_name, self.email_address)
    }
}

impl Default for EdgarUrls {
    fn default() -> Self {
        Self {
            archives: "https://www.sec.gov/Archives/edgar".to_string(),
            data: "https://data.sec.gov".to_string(),
            files: "https://www.sec.gov/files".to_string(),
        }
    }
}

impl EdgarUrls {
    /// Points every service at the same host, e.g. a local test server.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            archives: format!("{}/Archives/edgar", base),
            data: base.to_string(),
            files: format!("{}/files", base),
        }
    }

    pub fn submissions(&self, cik: &str) -> String {
        format!("{}/submissions/CIK{}.json", self.data, cik)
    }

    pub fn ticker_mapping(&self) -> String {
        format!("{}/company_tickers_exchange.json", self.files)
    }

    pub fn filing_document(&self, cik: &str, raw_accession: &str, filename: &str) -> String {
        format!(
            "{}/data/{}/{}/{}",
            self.archives, cik, raw_accession, filename
        )
    }
}
