//! Integration tests for the Jenkins notification webhook.
//!
//! The router is driven in-process with `oneshot`; a recording sink stands in
//! for Slack so deliveries can be counted and inspected.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use jenkins_relay::config::RelayConfig;
use jenkins_relay::services::color_policy::ColorPolicy;

use common::{post_json, router, send, RecordingSink};

const WAIT: Duration = Duration::from_secs(2);

fn started_payload() -> serde_json::Value {
    json!({
        "name": "api",
        "url": "job/api/",
        "build": {
            "full_url": "http://ci/job/api/12/",
            "number": 12,
            "phase": "STARTED",
            "scm": { "commit": "abc123", "branch": "origin/main" }
        }
    })
}

fn finalized_payload(status: &str) -> serde_json::Value {
    json!({
        "name": "api",
        "build": {
            "full_url": "http://ci/job/api/12/",
            "number": 12,
            "phase": "FINALIZED",
            "status": status
        }
    })
}

/// Let spawned relay tasks run, then confirm nothing reached the sink.
async fn assert_no_delivery(probe: &mut common::SinkProbe) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(probe.delivered.try_recv().is_err(), "unexpected delivery");
}

#[tokio::test]
async fn missing_room_is_bad_request_without_delivery() {
    let (sink, mut probe) = RecordingSink::new();
    let app = router(RelayConfig::default(), sink, None);

    let (resp, body) = send(app, post_json("/hubot/jenkins", &started_payload())).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body, "Bad Request");
    assert_no_delivery(&mut probe).await;
    assert!(probe.started.try_recv().is_err());
}

#[tokio::test]
async fn empty_room_is_bad_request() {
    let (sink, mut probe) = RecordingSink::new();
    let app = router(RelayConfig::default(), sink, None);

    let (resp, _) = send(app, post_json("/hubot/jenkins?room=", &started_payload())).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_no_delivery(&mut probe).await;
}

#[tokio::test]
async fn responds_before_delivery_completes() {
    let gate = Arc::new(Semaphore::new(0));
    let (sink, mut probe) = RecordingSink::gated(gate.clone());
    let app = router(RelayConfig::default(), sink, None);

    let (resp, body) = send(app, post_json("/hubot/jenkins?room=ops", &started_payload())).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(body.is_empty());

    // Sink has been entered but is still blocked on the gate.
    timeout(WAIT, probe.started.recv())
        .await
        .expect("sink never called")
        .unwrap();
    assert!(probe.delivered.try_recv().is_err());

    gate.add_permits(1);
    let (channel, message) = timeout(WAIT, probe.delivered.recv())
        .await
        .expect("delivery never completed")
        .unwrap();

    assert_eq!(channel, "#ops");
    let att = &message.attachments[0];
    assert_eq!(att.pretext.as_deref(), Some("api STARTED http://ci/job/api/12/"));
    let titles: Vec<_> = att.fields.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Phase", "Build #", "Commit SHA1", "Branch"]);

    gate.add_permits(1);
    assert_no_delivery(&mut probe).await;
}

#[tokio::test]
async fn finalized_uses_configured_colors() {
    let vars = [("COLOR_FAILURE", "#aa0000")];
    let config = RelayConfig {
        colors: ColorPolicy::from_lookup(|k| {
            vars.iter().find(|(key, _)| *key == k).map(|(_, v)| v.to_string())
        }),
        ..RelayConfig::default()
    };
    let (sink, mut probe) = RecordingSink::new();
    let app = router(config, sink, None);

    let (resp, _) = send(app, post_json("/hubot/jenkins?room=builds", &finalized_payload("FAILURE"))).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let (channel, message) = timeout(WAIT, probe.delivered.recv()).await.unwrap().unwrap();
    assert_eq!(channel, "#builds");
    let att = &message.attachments[0];
    assert_eq!(att.color.as_deref(), Some("#aa0000"));
    assert_eq!(
        att.pretext.as_deref(),
        Some("api FINALIZED with FAILURE http://ci/job/api/12/")
    );
    assert_eq!(att.fallback, att.pretext);
}

#[tokio::test]
async fn finalized_success_defaults_to_good() {
    let (sink, mut probe) = RecordingSink::new();
    let app = router(RelayConfig::default(), sink, None);

    send(app, post_json("/hubot/jenkins?room=ops&debug=1", &finalized_payload("SUCCESS"))).await;

    let (_, message) = timeout(WAIT, probe.delivered.recv()).await.unwrap().unwrap();
    assert_eq!(message.attachments[0].color.as_deref(), Some("good"));
}

#[tokio::test]
async fn silent_phases_are_accepted_but_not_delivered() {
    for phase in ["QUEUED", "COMPLETED", "PAUSED"] {
        let (sink, mut probe) = RecordingSink::new();
        let app = router(RelayConfig::default(), sink, None);
        let payload = json!({ "name": "api", "build": { "phase": phase, "status": "SUCCESS" } });

        let (resp, _) = send(app, post_json("/hubot/jenkins?room=ops", &payload)).await;

        assert_eq!(resp.status(), StatusCode::ACCEPTED, "{phase}");
        assert_no_delivery(&mut probe).await;
    }
}

#[tokio::test]
async fn malformed_body_is_accepted_and_dropped() {
    let (sink, mut probe) = RecordingSink::new();
    let app = router(RelayConfig::default(), sink, None);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/hubot/jenkins?room=ops")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (resp, _) = send(app, request).await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_no_delivery(&mut probe).await;
}

#[tokio::test]
async fn mistyped_optional_member_still_relays() {
    let (sink, mut probe) = RecordingSink::new();
    let app = router(RelayConfig::default(), sink, None);
    let mut payload = started_payload();
    payload["build"]["status"] = json!(0);

    let (resp, _) = send(app, post_json("/hubot/jenkins?room=ops", &payload)).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let (channel, message) = timeout(WAIT, probe.delivered.recv()).await.unwrap().unwrap();
    assert_eq!(channel, "#ops");
    assert_eq!(
        message.attachments[0].pretext.as_deref(),
        Some("api STARTED http://ci/job/api/12/")
    );
}

#[tokio::test]
async fn webhook_path_follows_service_name() {
    let config = RelayConfig {
        service_name: "ci-bot".into(),
        ..RelayConfig::default()
    };
    let (sink, mut probe) = RecordingSink::new();
    let app = router(config, sink, None);

    let (resp, _) = send(app.clone(), post_json("/hubot/jenkins?room=ops", &started_payload())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let (resp, _) = send(app, post_json("/ci-bot/jenkins?room=ops", &started_payload())).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let (channel, _) = timeout(WAIT, probe.delivered.recv()).await.unwrap().unwrap();
    assert_eq!(channel, "#ops");
}

#[tokio::test]
async fn health_check() {
    let (sink, _probe) = RecordingSink::new();
    let app = router(RelayConfig::default(), sink, None);

    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let (resp, body) = send(app, request).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body, "ok");
}
