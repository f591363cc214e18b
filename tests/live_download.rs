use edgar_downloader::{DownloadOptions, Downloader, DownloaderConfig, EdgarError};

fn config(folder: &std::path::Path) -> DownloaderConfig {
    DownloaderConfig::new("test_agent", "example@example.com").with_download_folder(folder)
}

#[tokio::test]
#[ignore]
async fn download_latest_annual_report() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(config(dir.path())).await.unwrap();

    let options = DownloadOptions::new()
        .with_limit(1)
        .with_download_details(true);
    let count = downloader.download("10-K", "AAPL", options).await.unwrap();
    assert_eq!(count, 1);

    let form_folder = dir
        .path()
        .join("sec-edgar-filings")
        .join("AAPL")
        .join("10-K");
    let filing = std::fs::read_dir(&form_folder)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    assert!(filing.join("full-index.htm").exists());
    assert!(filing.join("filing-details.html").exists());
}

#[tokio::test]
#[ignore]
async fn download_by_cik_in_date_window() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(config(dir.path())).await.unwrap();

    let options = DownloadOptions::new().with_date_range("2023-01-01", "2023-12-31");
    let count = downloader.download("10-K", "320193", options).await.unwrap();
    assert_eq!(count, 1);
    assert!(
        dir.path()
            .join("sec-edgar-filings")
            .join("0000320193")
            .join("10-K")
            .exists()
    );
}

#[tokio::test]
#[ignore]
async fn unknown_ticker() {
    let dir = tempfile::tempdir().unwrap();
    let downloader = Downloader::new(config(dir.path())).await.unwrap();

    let result = downloader
        .download("10-K", "NOT-A-TICKER", DownloadOptions::new())
        .await;
    assert!(matches!(result, Err(EdgarError::UnknownSymbol(_))));
}
