mod common;

use common::read_fixture;
use edgar_downloader::{EdgarError, TickerMapping, resolve_cik};

fn mapping() -> TickerMapping {
    let content = read_fixture("tickers/company_tickers_exchange.json");
    TickerMapping::from_json_slice(content.as_bytes()).unwrap()
}

#[test]
fn parse_ticker_table() {
    let mapping = mapping();

    assert_eq!(mapping.len(), 6);
    assert_eq!(mapping.get("AAPL"), Some("0000320193"));
    assert_eq!(mapping.get("nvda"), Some("0001045810"));
    assert_eq!(mapping.get("BRK-A"), mapping.get("BRK-B"));
    assert_eq!(mapping.get("GOOG"), None);
}

#[test]
fn resolve_tickers_and_ciks() {
    let mapping = mapping();

    assert_eq!(resolve_cik("msft", &mapping).unwrap(), "0000789019");
    assert_eq!(resolve_cik("789019", &mapping).unwrap(), "0000789019");
    assert_eq!(resolve_cik("0000789019", &mapping).unwrap(), "0000789019");
    // CIKs are not checked against the table
    assert_eq!(resolve_cik("42", &mapping).unwrap(), "0000000042");
}

#[test]
fn resolve_rejections() {
    let mapping = mapping();

    assert!(matches!(
        resolve_cik("12345678901", &mapping),
        Err(EdgarError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        resolve_cik("", &mapping),
        Err(EdgarError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        resolve_cik("GOOG", &mapping),
        Err(EdgarError::UnknownSymbol(_))
    ));
}

#[test]
fn keyed_ticker_layout() {
    let content = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
    }"#;
    let mapping = TickerMapping::from_json_slice(content.as_bytes()).unwrap();

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("aapl"), Some("0000320193"));
}

#[test]
fn empty_ticker_table() {
    let content = r#"{"fields": ["cik", "name", "ticker", "exchange"], "data": []}"#;
    assert!(matches!(
        TickerMapping::from_json_slice(content.as_bytes()),
        Err(EdgarError::DecodeError(_))
    ));
}
