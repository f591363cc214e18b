use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Invalid ticker or CIK: {0}")]
    InvalidIdentifier(String),

    #[error("Ticker {0} is invalid and cannot be mapped to a CIK")]
    UnknownSymbol(String),

    #[error("SEC returned non-success status code {status} for URL: {url}")]
    RemoteError { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    #[error("Invalid accession number: {0}")]
    MalformedIdentifier(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Incorrect date format, expected YYYY-MM-DD: {0}")]
    InvalidDate(String),

    #[error("Form {0} is not supported")]
    UnsupportedForm(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
}

impl From<serde_json::Error> for EdgarError {
    fn from(error: serde_json::Error) -> Self {
        EdgarError::DecodeError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdgarError>;
