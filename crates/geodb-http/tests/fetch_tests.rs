use std::time::Duration;

use geodb::{
    CollectingReporter, Fetcher, HookConfig, LicensedUrl, LifecycleEvent, SyncError, SyncOutcome,
    UrlTemplates, handle_event,
};
use geodb::test_support::{build_tarball, sha256_hex};
use geodb_http::HttpFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn licensed(server: &MockServer, suffix: &str) -> LicensedUrl {
    LicensedUrl::new(&format!("{}/geo/__LICENSE__/{suffix}", server.uri()), "k3y")
}

async fn mount_body(server: &MockServer, at: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/octet-stream"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn writes_response_body_to_destination() {
    let server = MockServer::start().await;
    mount_body(&server, "/geo/k3y/db.tar.gz", b"\x1f\x8bpayload".to_vec()).await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("db.tar.gz");
    let fetcher = HttpFetcher::new().unwrap();

    fetcher
        .fetch(&destination, &licensed(&server, "db.tar.gz"))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), b"\x1f\x8bpayload");
}

#[tokio::test]
async fn overwrites_existing_destination() {
    let server = MockServer::start().await;
    mount_body(&server, "/geo/k3y/db.sha256", b"short".to_vec()).await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("db.sha256");
    std::fs::write(&destination, "a much longer previous body").unwrap();

    HttpFetcher::new()
        .unwrap()
        .fetch(&destination, &licensed(&server, "db.sha256"))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&destination).unwrap(), "short");
}

#[tokio::test]
async fn http_error_status_fails_without_leaking_license() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/k3y/db.tar.gz"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = HttpFetcher::new()
        .unwrap()
        .fetch(&dir.path().join("db.tar.gz"), &licensed(&server, "db.tar.gz"))
        .await;

    match result {
        Err(SyncError::Network(msg)) => {
            assert!(msg.contains("401"));
            assert!(!msg.contains("k3y"));
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    let dir = tempfile::tempdir().unwrap();
    let url = LicensedUrl::new("http://127.0.0.1:1/geo/__LICENSE__/db.tar.gz", "k3y");

    let result = HttpFetcher::new()
        .unwrap()
        .fetch(&dir.path().join("db.tar.gz"), &url)
        .await;

    match result {
        Err(SyncError::Network(msg)) => assert!(!msg.contains("k3y")),
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/k3y/db.tar.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"late".to_vec(), "application/octet-stream")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = HttpFetcher::with_timeout(Duration::from_millis(200))
        .unwrap()
        .fetch(&dir.path().join("db.tar.gz"), &licensed(&server, "db.tar.gz"))
        .await;

    assert!(matches!(result, Err(SyncError::Network(_))));
}

#[tokio::test]
async fn unwritable_destination_is_fetch_failure() {
    let server = MockServer::start().await;
    mount_body(&server, "/geo/k3y/db.tar.gz", b"body".to_vec()).await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("missing-dir").join("db.tar.gz");

    let result = HttpFetcher::new()
        .unwrap()
        .fetch(&destination, &licensed(&server, "db.tar.gz"))
        .await;

    assert!(matches!(result, Err(SyncError::Network(_))));
}

#[tokio::test]
async fn post_install_hook_downloads_over_http() {
    let archive = build_tarball(&[(
        "GeoLite2-Country_20240101/GeoLite2-Country.mmdb",
        b"mmdb-bytes",
    )]);
    let hash = sha256_hex(&archive);

    let server = MockServer::start().await;
    mount_body(&server, "/geo/k3y/db.tar.gz", archive).await;
    mount_body(
        &server,
        "/geo/k3y/db.tar.gz.sha256",
        format!("{hash}  GeoLite2-Country_20240101.tar.gz\n").into_bytes(),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = HookConfig::new(dir.path().join("data"), Some("k3y".into()));
    config.templates = UrlTemplates {
        archive: format!("{}/geo/__LICENSE__/db.tar.gz", server.uri()),
        hash: format!("{}/geo/__LICENSE__/db.tar.gz.sha256", server.uri()),
    };
    let reporter = CollectingReporter::new();

    let outcome = handle_event(
        LifecycleEvent::PostInstall,
        &config,
        &HttpFetcher::new().unwrap(),
        &reporter,
    )
    .await
    .unwrap();

    let layout = config.layout();
    assert!(matches!(outcome, SyncOutcome::Updated { attempts: 1, .. }));
    assert_eq!(std::fs::read(layout.database()).unwrap(), b"mmdb-bytes");
    assert_eq!(geodb::read_token(&layout.hash_file()), Some(hash));
    assert!(reporter.errors().is_empty());
}
