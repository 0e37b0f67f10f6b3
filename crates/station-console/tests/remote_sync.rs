//! tests/remote_sync.rs

use mockito::Matcher;
use serde_json::json;
use station_console::{
    remote::CONFIG_ENDPOINT, HttpTransport, KeyField, KeyStore, KeysRecord, MemoryMedium, RemoteSync,
    SyncOutcome,
};
use url::Url;

fn transport_for(server: &mockito::ServerGuard) -> HttpTransport {
    HttpTransport::new(&Url::parse(&server.url()).unwrap())
}

#[tokio::test]
async fn push_sends_keys_with_edit_key_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CONFIG_ENDPOINT)
        .match_header("x-edit-key", "1234")
        .match_body(Matcher::PartialJson(json!({
            "keys": { "githubRepo": "o/r", "editModeKey": "1234" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true}"#)
        .expect(1)
        .create_async()
        .await;

    let mut record = KeysRecord::default();
    record.github_repo = "o/r".to_string();
    let outcome = RemoteSync::new(transport_for(&server))
        .push(CONFIG_ENDPOINT, &record)
        .await;

    mock.assert_async().await;
    assert_eq!(outcome, SyncOutcome::Ok { data: json!({ "ok": true }) });
    assert_eq!(outcome.status_text(), "Saved to backend: OK");
}

#[tokio::test]
async fn push_reports_server_error_as_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CONFIG_ENDPOINT)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let outcome = RemoteSync::new(transport_for(&server))
        .push(CONFIG_ENDPOINT, &KeysRecord::default())
        .await;

    mock.assert_async().await;
    match outcome {
        SyncOutcome::Unavailable { detail } => assert!(detail.contains("500"), "{detail}"),
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn pull_from_unreachable_backend_is_unavailable() {
    let transport = HttpTransport::new(&Url::parse("http://127.0.0.1:1").unwrap());
    let outcome = RemoteSync::new(transport).pull(CONFIG_ENDPOINT).await;

    assert!(!outcome.is_ok());
    assert_eq!(outcome.keys(), None);
}

#[tokio::test]
async fn pull_returns_keys_without_touching_store() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", CONFIG_ENDPOINT)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"keys": {"githubToken": "remote", "unknownKey": "x"}}"#)
        .create_async()
        .await;

    let store = KeyStore::new(Box::new(MemoryMedium::new()));
    let outcome = RemoteSync::new(transport_for(&server)).pull(CONFIG_ENDPOINT).await;

    let pulled = outcome.keys().unwrap();
    assert_eq!(pulled.github_token, "remote");
    assert_eq!(pulled.edit_mode_key, "1234");
    assert_eq!(store.load(), KeysRecord::default());

    store.save(&pulled);
    assert_eq!(store.load().github_token, "remote");
}

#[tokio::test]
async fn pull_reads_snake_case_backend_keys() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", CONFIG_ENDPOINT)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"keys": {"github_token": "remote", "github_repo": "o/r", "edit_mode_key": "1234"}}"#)
        .create_async()
        .await;

    let outcome = RemoteSync::new(transport_for(&server)).pull(CONFIG_ENDPOINT).await;

    let pulled = outcome.keys().unwrap();
    assert_eq!(pulled.github_token, "remote");
    assert_eq!(pulled.github_repo, "o/r");
    assert_eq!(pulled.edit_mode_key, "1234");
}

#[tokio::test]
async fn pull_without_known_keys_leaves_local_keys_alone() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", CONFIG_ENDPOINT)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"keys": {}}"#)
        .create_async()
        .await;

    let store = KeyStore::new(Box::new(MemoryMedium::new()));
    store.update(KeyField::GithubToken, "local-tok");

    let outcome = RemoteSync::new(transport_for(&server)).pull(CONFIG_ENDPOINT).await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.keys(), None);
    assert_eq!(store.load().github_token, "local-tok");
}

#[tokio::test]
async fn empty_success_body_is_null_data() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", CONFIG_ENDPOINT)
        .with_status(204)
        .create_async()
        .await;

    let outcome = RemoteSync::new(transport_for(&server)).pull(CONFIG_ENDPOINT).await;
    assert_eq!(outcome, SyncOutcome::Ok { data: serde_json::Value::Null });
}

#[tokio::test]
async fn push_with_blank_edit_key_sends_no_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", CONFIG_ENDPOINT)
        .match_header("x-edit-key", Matcher::Missing)
        .with_status(403)
        .with_body(r#"{"error": "forbidden"}"#)
        .create_async()
        .await;

    let outcome = RemoteSync::new(transport_for(&server))
        .push(CONFIG_ENDPOINT, &KeysRecord::blank())
        .await;

    mock.assert_async().await;
    assert_eq!(
        outcome.status_text(),
        "Backend unavailable: /api/config/uui -> 403"
    );
}
