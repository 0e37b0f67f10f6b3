//! tests/ops_invoke.rs

use std::sync::Mutex;

use mockito::Matcher;
use serde_json::{json, Value};
use station_console::{
    ops::{self, STUB_UNAVAILABLE},
    GuardResult, HttpTransport, KeysRecord, OpAction, OpOutcome, RemoteError, Transport,
};
use url::Url;

/// Records every request instead of sending it.
#[derive(Default)]
struct RecordingTransport {
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn get_json(&self, path: &str) -> Result<Value, RemoteError> {
        self.calls.lock().unwrap().push((path.to_string(), Value::Null));
        Ok(json!({}))
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        _edit_key: Option<&str>,
    ) -> Result<Value, RemoteError> {
        self.calls.lock().unwrap().push((path.to_string(), body.clone()));
        Ok(json!({ "ok": true }))
    }
}

fn git_ready() -> KeysRecord {
    let mut record = KeysRecord::blank();
    record.edit_mode_key = "1234".to_string();
    record.github_token = "tok".to_string();
    record.github_repo = "o/r".to_string();
    record
}

#[tokio::test]
async fn blocked_actions_make_no_calls() {
    let transport = RecordingTransport::default();

    for action in OpAction::ALL {
        let out = ops::invoke(action, &KeysRecord::default(), &transport).await;
        assert_eq!(out, "Blocked by guard: githubToken missing");
    }
    let out = ops::invoke(OpAction::RenderDeploy, &git_ready(), &transport).await;
    assert_eq!(out, "Blocked by guard: renderApiKey missing");

    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn passing_guard_makes_exactly_one_call() {
    let transport = RecordingTransport::default();
    let record = git_ready();
    assert_eq!(ops::guard(OpAction::GitStatus, &record), GuardResult::Pass);

    let outcome = ops::run(OpAction::GitStatus, &record, &transport).await;
    assert_eq!(outcome, OpOutcome::Succeeded(json!({ "ok": true })));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "/ops/git_status");
    assert_eq!(calls[0].1["edit_key"], "1234");
    assert_eq!(calls[0].1["keys"], serde_json::to_value(&record).unwrap());
}

#[tokio::test]
async fn git_status_posts_edit_key_and_full_record() {
    let mut server = mockito::Server::new_async().await;
    let record = git_ready();
    let mock = server
        .mock("POST", "/ops/git_status")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "edit_key": "1234",
            "keys": serde_json::to_value(&record).unwrap(),
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "porcelain": ""}"#)
        .expect(1)
        .create_async()
        .await;

    let transport = HttpTransport::new(&Url::parse(&server.url()).unwrap());
    let out = ops::invoke(OpAction::GitStatus, &record, &transport).await;

    mock.assert_async().await;
    assert_eq!(out, "{\n  \"ok\": true,\n  \"porcelain\": \"\"\n}");
}

#[tokio::test]
async fn blocked_action_never_reaches_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let transport = HttpTransport::new(&Url::parse(&server.url()).unwrap());
    let out = ops::invoke(OpAction::GitPush, &KeysRecord::blank(), &transport).await;

    mock.assert_async().await;
    assert_eq!(out, "Blocked by guard: editModeKey missing");
}

#[tokio::test]
async fn failing_backend_yields_stub_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/ops/git_push")
        .with_status(404)
        .create_async()
        .await;

    let transport = HttpTransport::new(&Url::parse(&server.url()).unwrap());
    let out = ops::invoke(OpAction::GitPush, &git_ready(), &transport).await;

    mock.assert_async().await;
    assert_eq!(out, format!("{STUB_UNAVAILABLE}\n/ops/git_push -> 404"));
}

#[tokio::test]
async fn unreachable_backend_yields_stub_message() {
    let transport = HttpTransport::new(&Url::parse("http://127.0.0.1:1").unwrap());
    let mut record = git_ready();
    record.render_api_key = "rnd".to_string();

    let outcome = ops::run(OpAction::RenderDeploy, &record, &transport).await;
    match &outcome {
        OpOutcome::Failed(detail) => assert!(detail.starts_with("/ops/render_deploy -> ")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(outcome.render().starts_with(STUB_UNAVAILABLE));
}
