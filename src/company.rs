//! Company identity lookups.
//!
//! EDGAR addresses companies and individuals by CIK (Central Index Key), a number the
//! API expects zero-padded to ten digits. People usually know a ticker instead, so the
//! downloader fetches the SEC ticker table once per session into a [`TickerMapping`]
//! and resolves every request against it with [`resolve_cik`].

use super::error::{EdgarError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Number of digits in a canonical CIK.
pub const CIK_LENGTH: usize = 10;

/// Ticker → zero-padded CIK snapshot, fetched once per session.
///
/// Tickers are stored upper-cased and CIKs are always ten digits, whatever shape the
/// source table used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerMapping {
    ciks: HashMap<String, String>,
}

/// Entry of the keyed `company_tickers.json` layout.
#[derive(Debug, Deserialize)]
struct CompanyTicker {
    #[serde(rename = "cik_str")]
    cik: serde_json::Value,
    ticker: String,
}

impl TickerMapping {
    /// Parses an SEC ticker table.
    ///
    /// The tabular layout `{"fields": [...], "data": [[...], ...]}` is the primary
    /// format; the column order is read from `fields` (`cik` or `cik_str`, and
    /// `ticker`). The keyed layout of `company_tickers.json`
    /// (`{"0": {"cik_str": 320193, "ticker": "AAPL", ...}, ...}`) is accepted too.
    /// Rows without a usable CIK or ticker are dropped.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::DecodeError` if the body is not JSON, the required columns
    /// are missing, or no row yields a mapping.
    pub fn from_json_slice(content: &[u8]) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_slice(content)?;

        let mapping = if json.get("fields").is_some() {
            Self::from_table(&json)?
        } else {
            let entries: HashMap<String, CompanyTicker> = serde_json::from_value(json)?;
            entries
                .into_values()
                .filter_map(|entry| Some((entry.ticker, cik_from_value(&entry.cik)?)))
                .collect()
        };

        if mapping.is_empty() {
            return Err(EdgarError::DecodeError(
                "No ticker to CIK mappings found in the response".to_string(),
            ));
        }
        Ok(mapping)
    }

    fn from_table(json: &serde_json::Value) -> Result<Self> {
        let fields = json["fields"]
            .as_array()
            .ok_or_else(|| EdgarError::DecodeError("Missing 'fields' array".to_string()))?;

        let data = json["data"]
            .as_array()
            .ok_or_else(|| EdgarError::DecodeError("Missing 'data' array".to_string()))?;

        let extractor = FieldExtractor::new(
            fields,
            &[("cik", &["cik", "cik_str"][..]), ("ticker", &["ticker"][..])],
        )?;

        Ok(data
            .iter()
            .filter_map(|row| row.as_array())
            .filter_map(|row| {
                let cik = extractor.extract_value(row, "cik", cik_from_value)?;
                let ticker =
                    extractor.extract_value(row, "ticker", |v| v.as_str().map(String::from))?;
                Some((ticker, cik))
            })
            .collect())
    }

    /// Looks up the CIK for a ticker, ignoring case.
    pub fn get(&self, ticker: &str) -> Option<&str> {
        self.ciks
            .get(&ticker.trim().to_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ciks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciks.is_empty()
    }
}

impl<T: Into<String>, C: Into<String>> FromIterator<(T, C)> for TickerMapping {
    fn from_iter<I: IntoIterator<Item = (T, C)>>(iter: I) -> Self {
        let ciks = iter
            .into_iter()
            .map(|(ticker, cik)| (ticker.into().trim().to_uppercase(), pad_cik(&cik.into())))
            .collect();
        Self { ciks }
    }
}

/// Maps logical column names to their positions in a tabular SEC response.
///
/// Each logical column may go by several names; the first alias present in `fields`
/// wins, compared case-insensitively.
struct FieldExtractor {
    indices: HashMap<&'static str, usize>,
}

impl FieldExtractor {
    fn new(
        fields: &[serde_json::Value],
        required: &[(&'static str, &[&str])],
    ) -> Result<Self> {
        let mut indices = HashMap::new();

        for (name, aliases) in required {
            let idx = fields
                .iter()
                .position(|field| {
                    field
                        .as_str()
                        .is_some_and(|f| aliases.iter().any(|a| f.eq_ignore_ascii_case(a)))
                })
                .ok_or_else(|| {
                    EdgarError::DecodeError(format!("Missing '{}' field", name))
                })?;
            indices.insert(*name, idx);
        }

        Ok(Self { indices })
    }

    fn extract_value<T, F>(&self, row: &[serde_json::Value], field: &str, converter: F) -> Option<T>
    where
        F: Fn(&serde_json::Value) -> Option<T>,
    {
        let idx = self.indices.get(field).copied()?;
        row.get(idx).and_then(converter)
    }
}

/// CIKs arrive as JSON numbers or strings.
fn cik_from_value(value: &serde_json::Value) -> Option<String> {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_u64()?.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if is_cik(&raw) && raw.len() <= CIK_LENGTH {
        Some(pad_cik(&raw))
    } else {
        None
    }
}

/// Returns true if the input is made of ASCII digits only.
pub fn is_cik(ticker_or_cik: &str) -> bool {
    !ticker_or_cik.is_empty() && ticker_or_cik.bytes().all(|b| b.is_ascii_digit())
}

/// Left-pads a CIK with zeros to [`CIK_LENGTH`] digits.
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>width$}", cik, width = CIK_LENGTH)
}

/// Resolves a ticker or CIK to the zero-padded CIK EDGAR expects.
///
/// The input is trimmed and upper-cased. Numeric inputs are treated as CIKs and padded
/// to ten digits; anything else is looked up in `mapping`. No network access happens
/// here.
///
/// # Errors
///
/// * `EdgarError::InvalidIdentifier` - The input is blank, or numeric with more than ten
///   digits
/// * `EdgarError::UnknownSymbol` - The ticker is not in `mapping`
///
/// # Example
///
/// ```rust
/// use edgar_downloader::{TickerMapping, resolve_cik};
/// let mapping: TickerMapping = [("AAPL", "320193")].into_iter().collect();
/// assert_eq!(resolve_cik("aapl", &mapping)?, "0000320193");
/// assert_eq!(resolve_cik("1318605", &mapping)?, "0001318605");
/// # Ok::<(), edgar_downloader::EdgarError>(())
/// ```
pub fn resolve_cik(ticker_or_cik: &str, mapping: &TickerMapping) -> Result<String> {
    let ticker_or_cik = ticker_or_cik.trim().to_uppercase();

    if ticker_or_cik.is_empty() {
        return Err(EdgarError::InvalidIdentifier(
            "please enter a non-blank value".to_string(),
        ));
    }

    if is_cik(&ticker_or_cik) {
        if ticker_or_cik.len() > CIK_LENGTH {
            return Err(EdgarError::InvalidIdentifier(format!(
                "CIKs must be at most {} digits long, got {}",
                CIK_LENGTH, ticker_or_cik
            )));
        }
        return Ok(pad_cik(&ticker_or_cik));
    }

    mapping
        .get(&ticker_or_cik)
        .map(String::from)
        .ok_or(EdgarError::UnknownSymbol(ticker_or_cik))
}
