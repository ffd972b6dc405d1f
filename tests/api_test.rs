//! APIクライアント/送信フローの統合テスト
//!
//! モックサーバでエンドポイント契約（single/batch振り分け、
//! success判定、統計更新、フォールバック）を検証する。

use httpmock::prelude::*;
use meishi_scan::api::ApiClient;
use meishi_scan::error::MeishiScanError;
use meishi_scan::intake;
use meishi_scan::session::Session;
use meishi_scan::submit;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

fn session_with_files(dir: &Path, names: &[&str]) -> Session {
    let paths: Vec<_> = names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, vec![0u8; 1024]).unwrap();
            path
        })
        .collect();

    let mut session = Session::new();
    let report = session.add_files(intake::collect_candidates(&paths).unwrap());
    assert_eq!(report.added.len(), names.len());
    session
}

#[tokio::test]
async fn test_single_file_targets_single_endpoint() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/single")
            .body_contains("name=\"image\"")
            .body_contains("name=\"model\"");
        then.status(200).json_body(json!({
            "success": true,
            "filename": "card.png",
            "model_used": "nvidia",
            "data": {"name": "Jane Doe", "company": "Acme Corp", "tokens": 120}
        }));
    });

    let dir = tempdir().unwrap();
    let mut session = session_with_files(dir.path(), &["card.png"]);
    let client = ApiClient::new(&server.base_url(), 30).unwrap();

    let results = submit::submit_pending(&mut session, &client, "auto")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].model_used, "nvidia");

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.stats().total_cards, 1);
    assert_eq!(session.stats().successful_cards, 1);
    assert_eq!(session.stats().tokens_used, 120);
}

#[tokio::test]
async fn test_multiple_files_target_batch_endpoint() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/batch")
            .body_contains("name=\"images\"");
        then.status(200).json_body(json!({
            "success": true,
            "total": 2,
            "results": [
                {"filename": "a.png", "success": true,
                 "data": {"name": "A", "tokens": 50}, "model_used": "nvidia", "error": null},
                {"filename": "b.png", "success": false,
                 "data": null, "model_used": "failed",
                 "error": "Extraction failed with all models"}
            ]
        }));
    });

    let dir = tempdir().unwrap();
    let mut session = session_with_files(dir.path(), &["a.png", "b.png"]);
    let client = ApiClient::new(&server.base_url(), 30).unwrap();

    let results = submit::submit_pending(&mut session, &client, "auto")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(results.len(), 2);
    assert_eq!(submit::successful_count(&results), 1);

    // 失敗アイテムも履歴に残り、統計の成功数には入らない
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.stats().total_cards, 2);
    assert_eq!(session.stats().successful_cards, 1);
    assert_eq!(session.stats().tokens_used, 50);
}

#[tokio::test]
async fn test_empty_pending_is_noop() {
    let server = MockServer::start();
    let single = server.mock(|when, then| {
        when.method(POST).path("/api/single");
        then.status(200);
    });
    let batch = server.mock(|when, then| {
        when.method(POST).path("/api/batch");
        then.status(200);
    });

    let client = ApiClient::new(&server.base_url(), 30).unwrap();
    let mut session = Session::new();

    let results = submit::submit_pending(&mut session, &client, "auto")
        .await
        .unwrap();

    assert!(results.is_empty());
    single.assert_hits(0);
    batch.assert_hits(0);
}

#[tokio::test]
async fn test_backend_failure_preserves_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/single");
        then.status(500)
            .json_body(json!({"success": false, "error": "No image provided"}));
    });

    let dir = tempdir().unwrap();
    let mut session = session_with_files(dir.path(), &["card.png"]);
    let client = ApiClient::new(&server.base_url(), 30).unwrap();

    let err = submit::submit_pending(&mut session, &client, "auto")
        .await
        .unwrap_err();

    assert!(matches!(err, MeishiScanError::Backend(message) if message == "No image provided"));
    assert!(session.history().is_empty());
    assert_eq!(session.stats().total_cards, 0);
    // 保留リストはそのまま（再送信できる）
    assert_eq!(session.pending().len(), 1);
    assert!(!session.is_in_flight());
}

#[tokio::test]
async fn test_malformed_response_is_parse_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/single");
        then.status(200).body("not json");
    });

    let dir = tempdir().unwrap();
    let mut session = session_with_files(dir.path(), &["card.png"]);
    let client = ApiClient::new(&server.base_url(), 30).unwrap();

    let err = submit::submit_pending(&mut session, &client, "auto")
        .await
        .unwrap_err();

    assert!(matches!(err, MeishiScanError::ApiParse(_)));
    assert!(session.history().is_empty());
    assert!(!session.is_in_flight());
}

#[tokio::test]
async fn test_health_populates_model_catalog() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200).json_body(json!({
            "status": "healthy",
            "models": ["nvidia", "mistral", "microsoft", "gemini"],
            "endpoints": ["/api/single", "/api/batch"]
        }));
    });

    let client = ApiClient::new(&server.base_url(), 30).unwrap();
    let catalog = client.model_catalog().await;

    assert!(catalog.connected);
    assert_eq!(
        catalog.options(),
        vec!["auto", "nvidia", "mistral", "microsoft", "gemini"]
    );
}

#[tokio::test]
async fn test_unhealthy_status_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(json!({"status": "degraded", "models": ["nvidia"]}));
    });

    let client = ApiClient::new(&server.base_url(), 30).unwrap();
    let catalog = client.model_catalog().await;

    assert!(!catalog.connected);
    assert_eq!(catalog.options(), vec!["auto", "nvidia"]);
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    // 予約ポートなので接続は即失敗する
    let client = ApiClient::new("http://127.0.0.1:1", 1).unwrap();
    let catalog = client.model_catalog().await;

    assert!(!catalog.connected);
    assert_eq!(catalog.options(), vec!["auto", "nvidia"]);
}
