#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the NAS share probe.

use std::{fs, net::SocketAddr};

use {tempfile::TempDir, tokio::net::TcpListener};

use {
    atelier_config::{AtelierConfig, StorageConfig},
    atelier_gateway::{AppState, build_router},
};

/// Spin up a gateway over a fresh temp data dir and return the bound
/// address. The TempDir keeps the store alive for the test's duration.
async fn start_server() -> (SocketAddr, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AtelierConfig {
        storage: StorageConfig {
            data_dir: Some(dir.path().to_path_buf()),
        },
        ..AtelierConfig::default()
    };
    let app = build_router(AppState::from_config(&config).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, dir)
}

/// Register a user and return the bearer token.
async fn register(addr: SocketAddr) -> String {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/auth/register"))
        .json(&serde_json::json!({ "email": "jo@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Probe a path and return the raw response.
async fn probe(addr: SocketAddr, token: &str, path: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/api/nas/probe"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({ "path": path }))
        .send()
        .await
        .unwrap()
}

/// The probe returns the best description candidate with its content,
/// preferring `.txt` files.
#[tokio::test]
async fn probe_returns_the_preferred_description_file() {
    let (addr, _dir) = start_server().await;
    let token = register(addr).await;

    let share = tempfile::tempdir().unwrap();
    fs::write(share.path().join("DESCRIPTION.md"), "# markdown").unwrap();
    fs::write(share.path().join("project-desc.txt"), "main: From the share").unwrap();
    fs::write(share.path().join("unrelated.txt"), "noise").unwrap();

    let resp = probe(addr, &token, &share.path().to_string_lossy()).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["file"], "project-desc.txt");
    assert_eq!(body["content"], "main: From the share");
}

/// Probing needs a non-empty path.
#[tokio::test]
async fn probe_requires_a_path() {
    let (addr, _dir) = start_server().await;
    let token = register(addr).await;

    let client = reqwest::Client::new();
    for payload in [serde_json::json!({}), serde_json::json!({ "path": "" })] {
        let resp = client
            .post(format!("http://{addr}/api/nas/probe"))
            .header("Authorization", format!("Bearer {token}"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "{payload}");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Missing path");
    }
}

/// A directory without any `desc` candidate, or no directory at all, is
/// a 404.
#[tokio::test]
async fn probe_without_candidates_is_not_found() {
    let (addr, _dir) = start_server().await;
    let token = register(addr).await;

    let share = tempfile::tempdir().unwrap();
    fs::write(share.path().join("readme.txt"), "no match").unwrap();

    for path in [share.path().to_string_lossy().into_owned(), "/nonexistent/share".to_string()] {
        let resp = probe(addr, &token, &path).await;
        assert_eq!(resp.status(), 404, "{path}");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "No description file found");
    }
}
