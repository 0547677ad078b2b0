//! Shared fakes for router integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tokio::sync::{mpsc, Semaphore};
use tower::ServiceExt;

use jenkins_relay::config::RelayConfig;
use jenkins_relay::error::{JenkinsError, SinkError};
use jenkins_relay::models::job::Job;
use jenkins_relay::models::message::ChatMessage;
use jenkins_relay::routes::{relay_router, RelayState};
use jenkins_relay::services::chat_sink::{ChatSink, DeliveryStatus};
use jenkins_relay::services::jenkins_service::BuildServer;

/// What a fake sink saw: `(channel or response_url, message)`.
pub type Delivery = (String, ChatMessage);

/// Records deliveries on a channel. With a gate, each call first reports that
/// it started and then blocks until the test adds a permit.
pub struct RecordingSink {
    delivered: mpsc::UnboundedSender<Delivery>,
    responded: mpsc::UnboundedSender<Delivery>,
    started: mpsc::UnboundedSender<()>,
    gate: Option<Arc<Semaphore>>,
}

pub struct SinkProbe {
    pub delivered: mpsc::UnboundedReceiver<Delivery>,
    pub responded: mpsc::UnboundedReceiver<Delivery>,
    pub started: mpsc::UnboundedReceiver<()>,
}

impl RecordingSink {
    pub fn new() -> (Arc<Self>, SinkProbe) {
        Self::build(None)
    }

    pub fn gated(gate: Arc<Semaphore>) -> (Arc<Self>, SinkProbe) {
        Self::build(Some(gate))
    }

    fn build(gate: Option<Arc<Semaphore>>) -> (Arc<Self>, SinkProbe) {
        let (delivered_tx, delivered) = mpsc::unbounded_channel();
        let (responded_tx, responded) = mpsc::unbounded_channel();
        let (started_tx, started) = mpsc::unbounded_channel();
        let sink = Arc::new(Self {
            delivered: delivered_tx,
            responded: responded_tx,
            started: started_tx,
            gate,
        });
        (
            sink,
            SinkProbe {
                delivered,
                responded,
                started,
            },
        )
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn deliver(
        &self,
        channel: &str,
        message: &ChatMessage,
    ) -> Result<DeliveryStatus, SinkError> {
        let _ = self.started.send(());
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        let _ = self.delivered.send((channel.to_string(), message.clone()));
        Ok(DeliveryStatus::Sent)
    }

    async fn respond(&self, response_url: &str, message: &ChatMessage) -> Result<(), SinkError> {
        let _ = self.responded.send((response_url.to_string(), message.clone()));
        Ok(())
    }
}

/// In-memory build server.
#[derive(Default)]
pub struct FakeJenkins {
    pub jobs: Vec<Job>,
    pub fail: bool,
    pub builds: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeJenkins {
    pub fn with_jobs(jobs: &[(&str, &str)]) -> Self {
        Self {
            jobs: jobs
                .iter()
                .map(|(name, color)| Job {
                    name: name.to_string(),
                    color: Some(color.to_string()),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn builds(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.builds.lock().unwrap().clone()
    }
}

#[async_trait]
impl BuildServer for FakeJenkins {
    async fn list_jobs(&self) -> Result<Vec<Job>, JenkinsError> {
        if self.fail {
            return Err(JenkinsError::Status {
                status: 503,
                path: "api/json".into(),
            });
        }
        Ok(self.jobs.clone())
    }

    async fn build(&self, job: &str, parameters: &[(String, String)]) -> Result<(), JenkinsError> {
        if self.fail {
            return Err(JenkinsError::Status {
                status: 404,
                path: format!("job/{job}/build"),
            });
        }
        self.builds
            .lock()
            .unwrap()
            .push((job.to_string(), parameters.to_vec()));
        Ok(())
    }
}

pub fn router(
    config: RelayConfig,
    sink: Arc<dyn ChatSink>,
    jenkins: Option<Arc<dyn BuildServer>>,
) -> Router {
    relay_router(RelayState {
        config: Arc::new(config),
        sink,
        jenkins,
    })
}

pub async fn send(app: Router, request: Request<Body>) -> (Response<Body>, String) {
    let resp = app.oneshot(request).await.unwrap();
    let (parts, body) = resp.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    (Response::from_parts(parts, Body::empty()), text)
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}
