//! End-to-end: index fetch, flatten and sequential download against a local server.

mod common;

use common::filing_server::{Canned, FilingServer};
use esef_core::config::EsefConfig;
use esef_core::downloader::{self, DownloadOutcome};
use esef_core::index::{self, Filing, IndexError};
use esef_core::sync;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use tempfile::tempdir;

const LEI_A: &str = "5493001KJTIIGC8Y1R12";
const LEI_B: &str = "213800ABCDEFGHIJKL12";

fn index_body() -> Vec<u8> {
    let entity = |lei: &str| json!({ "links": { "related": format!("https://filings.xbrl.org/api/entities/{lei}") } });
    serde_json::to_vec(&json!({
        "data": [
            {
                "id": "1",
                "attributes": { "package_url": "/US/1234/report.zip", "country": "US" },
                "relationships": { "entity": entity(LEI_A) }
            },
            {
                "id": "2",
                "attributes": { "package_url": null, "country": "GB" },
                "relationships": { "entity": entity(LEI_B) }
            },
            {
                "id": "3",
                "attributes": { "package_url": "/GB/9/broken.zip", "country": "GB" },
                "relationships": { "entity": {} }
            },
            {
                "id": "4",
                "attributes": { "package_url": "/GB/9/annual%20report.zip", "country": "GB" },
                "relationships": { "entity": entity(LEI_B) }
            },
            {
                "id": "5",
                "attributes": { "package_url": "/US/1234/report-en.zip", "country": "US" },
                "relationships": { "entity": entity(LEI_A) }
            },
            {
                "id": "6",
                "attributes": { "package_url": "/US/5678/gone.zip", "country": "US" },
                "relationships": { "entity": entity(LEI_B) }
            }
        ]
    }))
    .unwrap()
}

fn start_server() -> FilingServer {
    let mut routes = HashMap::new();
    routes.insert("/api/filings".to_string(), Canned::Body(index_body()));
    routes.insert(
        "/US/1234/report.zip".to_string(),
        Canned::Body(b"PK-report".to_vec()),
    );
    routes.insert(
        "/US/1234/report-en.zip".to_string(),
        Canned::Body(b"PK-report-en".to_vec()),
    );
    routes.insert(
        "/GB/9/annual%20report.zip".to_string(),
        Canned::Body(b"PK-annual".to_vec()),
    );
    routes.insert("/XX/1/fail.zip".to_string(), Canned::Status(500));
    FilingServer::start(routes)
}

fn config_for(server: &FilingServer, archive_root: &Path) -> EsefConfig {
    EsefConfig {
        base_url: server.base_url.clone(),
        archive_root: archive_root.to_path_buf(),
        connect_timeout_secs: 5,
        timeout_secs: 10,
        ..EsefConfig::default()
    }
}

#[test]
fn fetch_index_keeps_usable_entries_in_order() {
    let server = start_server();
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());

    let listing = index::fetch_index(&cfg).unwrap();
    assert_eq!(listing.total_entries, 6);
    assert_eq!(listing.skipped.len(), 1);
    assert_eq!(listing.skipped[0].entry_id, "3");
    assert_eq!(listing.skipped[0].missing, "links");
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("/api/filings?page"));
    assert!(requests[0].ends_with("=999999"));

    let filings = listing.identifiers.flatten();
    let names: Vec<&str> = filings.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(
        names,
        ["report.zip", "report-en.zip", "annual report.zip", "gone.zip"]
    );
    assert_eq!(
        filings[0],
        Filing {
            country: "US".to_string(),
            file_name: "report.zip".to_string(),
            path: "/US/1234".to_string(),
        }
    );
}

#[test]
fn sync_downloads_skips_404_and_is_idempotent() {
    let server = start_server();
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());

    let summary = sync::run_sync(&cfg).unwrap();
    assert_eq!(summary.downloaded, 3);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.already_present, 0);
    assert_eq!(summary.bytes, (9 + 12 + 9) as u64);

    let root = archive.path();
    assert_eq!(std::fs::read(root.join("US/1234/report.zip")).unwrap(), b"PK-report");
    assert_eq!(
        std::fs::read(root.join("US/1234/report-en.zip")).unwrap(),
        b"PK-report-en"
    );
    assert_eq!(
        std::fs::read(root.join("GB/9/annual report.zip")).unwrap(),
        b"PK-annual"
    );
    assert!(root.join("US/5678").is_dir());
    assert!(!root.join("US/5678/gone.zip").exists());
    assert_eq!(server.hits("/US/1234/report.zip"), 1);

    // Second run: nothing present is requested again; the 404 is retried.
    let again = sync::run_sync(&cfg).unwrap();
    assert_eq!(again.already_present, 3);
    assert_eq!(again.not_found, 1);
    assert_eq!(again.downloaded, 0);
    assert_eq!(server.hits("/US/1234/report.zip"), 1);
    assert_eq!(server.hits("/US/1234/report-en.zip"), 1);
    assert_eq!(server.hits("/GB/9/annual%20report.zip"), 1);
    assert_eq!(server.hits("/US/5678/gone.zip"), 2);
    assert_eq!(server.hits("/api/filings"), 2);
}

#[test]
fn present_file_issues_no_request() {
    let server = start_server();
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());
    let filing = Filing {
        country: "US".to_string(),
        file_name: "report.zip".to_string(),
        path: "/US/1234".to_string(),
    };
    let dest = downloader::target_path(&cfg.archive_root, &filing);
    std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
    std::fs::write(&dest, b"half").unwrap();

    let outcome = downloader::download_package(&cfg, &filing).unwrap();
    assert_eq!(outcome, DownloadOutcome::AlreadyPresent);
    assert!(server.requests().is_empty());
    assert_eq!(std::fs::read(&dest).unwrap(), b"half");
}

#[test]
fn not_found_creates_no_file() {
    let server = start_server();
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());
    let filing = Filing {
        country: "US".to_string(),
        file_name: "missing.zip".to_string(),
        path: "/US/0".to_string(),
    };

    let outcome = downloader::download_package(&cfg, &filing).unwrap();
    assert_eq!(outcome, DownloadOutcome::NotFound);
    assert!(!downloader::target_path(&cfg.archive_root, &filing).exists());
    assert_eq!(server.requests(), ["/US/0/missing.zip"]);
}

#[test]
fn server_error_aborts_the_run() {
    let server = start_server();
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());
    let failing = Filing {
        country: "XX".to_string(),
        file_name: "fail.zip".to_string(),
        path: "/XX/1".to_string(),
    };
    let after = Filing {
        country: "US".to_string(),
        file_name: "report.zip".to_string(),
        path: "/US/1234".to_string(),
    };

    let err = sync::download_all(&cfg, &[failing.clone(), after.clone()]).unwrap_err();
    assert!(format!("{:#}", err).contains("HTTP 500"));
    assert!(!downloader::target_path(&cfg.archive_root, &failing).exists());
    assert!(!downloader::target_path(&cfg.archive_root, &after).exists());
    assert_eq!(server.hits("/US/1234/report.zip"), 0);
}

#[test]
fn index_without_data_is_fatal() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/filings".to_string(),
        Canned::Body(br#"{"errors": []}"#.to_vec()),
    );
    let server = FilingServer::start(routes);
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());

    assert!(matches!(
        index::fetch_index(&cfg),
        Err(IndexError::MissingData)
    ));
    assert!(sync::run_sync(&cfg).is_err());
}

#[test]
fn index_http_error_is_fatal() {
    let server = FilingServer::start(HashMap::new());
    let archive = tempdir().unwrap();
    let cfg = config_for(&server, archive.path());

    match index::fetch_index(&cfg) {
        Err(IndexError::Http(e)) => assert!(e.is_not_found()),
        other => panic!("expected HTTP error, got {:?}", other.map(|l| l.total_entries)),
    }
}
