//! End-to-end fetch tests against a local HTTP server.

use std::sync::Arc;
use std::thread;

use tarpull::{Fetcher, HttpClient, TarpullError};
use tempfile::TempDir;
use tiny_http::{Response, Server, StatusCode};

/// Serve `.tgz` requests with a fixed payload and everything else with 404.
fn spawn_server() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = if request.url().ends_with(".tgz") {
                Response::from_data(b"tarball bytes".to_vec()).boxed()
            } else {
                Response::empty(StatusCode(404)).boxed()
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{addr}")
}

fn fetcher() -> Fetcher {
    Fetcher::new(Arc::new(HttpClient::new().unwrap()))
}

#[tokio::test]
async fn fetch_writes_file_named_after_url() {
    let base = spawn_server();
    let tmp = TempDir::new().unwrap();

    let path = fetcher()
        .fetch(&format!("{base}/bower/-/bower-1.7.7.tgz"), tmp.path())
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "bower-1.7.7.tgz");
    assert!(path.starts_with(tmp.path().canonicalize().unwrap()));

    let contents = tokio::fs::read(&path).await.unwrap();
    assert_eq!(contents, b"tarball bytes");
}

#[tokio::test]
async fn fetch_rejects_http_error_status() {
    let base = spawn_server();
    let tmp = TempDir::new().unwrap();

    let err = fetcher()
        .fetch(&format!("{base}/missing/archive.zip"), tmp.path())
        .await
        .unwrap_err();

    match err {
        TarpullError::Download { url, reason } => {
            assert!(url.ends_with("/missing/archive.zip"));
            assert!(reason.contains("404"), "reason was: {reason}");
        }
        other => panic!("expected Download error, got: {other}"),
    }
}

#[tokio::test]
async fn fetch_rejects_missing_destination_directory() {
    let base = spawn_server();
    let tmp = TempDir::new().unwrap();
    let gone = tmp.path().join("does-not-exist");

    let err = fetcher()
        .fetch(&format!("{base}/bower/-/bower-1.7.7.tgz"), &gone)
        .await
        .unwrap_err();

    assert!(matches!(err, TarpullError::Download { .. }));
}

#[tokio::test]
async fn concurrent_fetches_do_not_interfere() {
    let base = spawn_server();
    let tmp_a = TempDir::new().unwrap();
    let tmp_b = TempDir::new().unwrap();
    let fetcher = fetcher();

    let url = format!("{base}/bower/-/bower-1.7.7.tgz");
    let (a, b) = tokio::join!(fetcher.fetch(&url, tmp_a.path()), fetcher.fetch(&url, tmp_b.path()));

    assert_eq!(a.unwrap().file_name().unwrap(), "bower-1.7.7.tgz");
    assert_eq!(b.unwrap().file_name().unwrap(), "bower-1.7.7.tgz");
}
