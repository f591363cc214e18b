mod common;

use common::read_fixture;
use edgar_downloader::{
    DownloadOptions, EdgarUrls, FilingFilter, Submission, select_filings,
};
use std::path::Path;

const CIK: &str = "0000320193";

fn submission() -> Submission {
    let content = read_fixture("submissions/CIK0000320193.json");
    serde_json::from_str(&content).unwrap()
}

fn filter(form: &str, options: DownloadOptions) -> FilingFilter {
    FilingFilter::from_options(
        form,
        CIK,
        Some("AAPL".to_string()),
        options,
        Path::new("/data"),
    )
    .unwrap()
}

#[test]
fn parse_submission() {
    let submission = submission();

    assert_eq!(submission.cik, "320193");
    assert_eq!(submission.name.as_deref(), Some("Apple Inc."));
    assert_eq!(submission.tickers, vec!["AAPL"]);

    let recent = &submission.filings.recent;
    assert_eq!(recent.len(), 7);

    let first = recent.records().next().unwrap();
    assert_eq!(first.accession_number, "0000320193-24-000123");
    assert_eq!(first.filing_date, "2024-11-01");
    assert_eq!(first.form, "10-K");
    assert_eq!(first.primary_document, "aapl-20240928.htm");

    let eight_k = recent.records().nth(2).unwrap();
    assert_eq!(eight_k.items, "2.02,9.01");
}

#[test]
fn select_annual_reports_in_window() {
    let options = DownloadOptions::new().with_date_range("2023-01-01", "2024-12-31");
    let selected = select_filings(&submission(), &filter("10-K", options), &EdgarUrls::default())
        .unwrap();

    let accessions: Vec<_> = selected.iter().map(|f| f.accession_number.as_str()).collect();
    assert_eq!(accessions, vec!["0000320193-24-000123", "0000320193-23-000106"]);

    assert_eq!(
        selected[0].raw_filing_uri,
        "https://www.sec.gov/Archives/edgar/data/0000320193/000032019324000123/0000320193-24-000123-index.htm"
    );
    assert_eq!(
        selected[0].primary_doc_uri.as_deref(),
        Some("https://www.sec.gov/Archives/edgar/data/0000320193/000032019324000123/aapl-20240928.htm")
    );
    assert_eq!(selected[0].details_doc_suffix.as_deref(), Some(".html"));
}

#[test]
fn select_with_amendments() {
    let options = DownloadOptions::new()
        .with_date_range("2023-01-01", "2024-12-31")
        .with_include_amendments(true);
    let selected = select_filings(&submission(), &filter("10-K", options), &EdgarUrls::default())
        .unwrap();

    let accessions: Vec<_> = selected.iter().map(|f| f.accession_number.as_str()).collect();
    assert_eq!(
        accessions,
        vec![
            "0000320193-24-000123",
            "0000320193-23-000106",
            "0000320193-23-000077"
        ]
    );
}

#[test]
fn select_latest_with_limit_and_skip_list() {
    let options = DownloadOptions::new()
        .with_limit(1)
        .with_accession_numbers_to_skip(["0000320193-24-000123"]);
    let selected = select_filings(&submission(), &filter("10-K", options), &EdgarUrls::default())
        .unwrap();

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].accession_number, "0000320193-23-000106");
}

#[test]
fn ownership_form_has_no_details_page() {
    let selected = select_filings(
        &submission(),
        &filter("4", DownloadOptions::new()),
        &EdgarUrls::default(),
    )
    .unwrap();

    assert_eq!(selected.len(), 1);
    let filing = &selected[0];
    assert_eq!(filing.details_doc_suffix, None);
    assert_eq!(filing.details_doc_uri(&EdgarUrls::default(), CIK), None);
    assert_eq!(
        filing.primary_doc_filename(),
        Some("wf-form4_168417545779523.xml")
    );
}

#[test]
fn details_page_uri() {
    let selected = select_filings(
        &submission(),
        &filter("8-K", DownloadOptions::new()),
        &EdgarUrls::default(),
    )
    .unwrap();

    assert_eq!(
        selected[0].details_doc_uri(&EdgarUrls::default(), CIK).as_deref(),
        Some("https://www.sec.gov/Archives/edgar/data/0000320193/000032019324000069/0000320193-24-000069-index-headers.html")
    );
}
