//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use honeytoken_server::notification::{Notifier, NotifyError};
use honeytoken_server::registry::{MemoryRegistry, NewHoneytoken};
use honeytoken_server::{TrapConfig, TrapServer};

/// Notifier that records every alert it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Alerts delivered so far, after giving detached tasks time to run.
    pub async fn sent(&self) -> Vec<(String, String)> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, receiver: &str, message: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((receiver.to_string(), message.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Notifier whose deliveries never finish.
#[derive(Default)]
pub struct BlockingNotifier {
    pub started: AtomicUsize,
}

#[async_trait]
impl Notifier for BlockingNotifier {
    async fn notify(&self, _receiver: &str, _message: &str) -> Result<(), NotifyError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}

impl BlockingNotifier {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

/// A config serving `body` from a temp file with the given head.
pub fn decoy_config(
    dir: &tempfile::TempDir,
    body: &str,
    content_type: &str,
    status_code: u16,
) -> TrapConfig {
    let file = dir.path().join("decoy");
    std::fs::write(&file, body).unwrap();

    let mut config = TrapConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.response.file = file.display().to_string();
    config.response.content_type = content_type.into();
    config.response.status_code = status_code;
    config.registry.database_url = "sqlite::memory:".into();
    config
}

/// Registry seeded with `(url, receiver)` pairs.
pub fn registry_with(tokens: &[(&str, &str)]) -> Arc<MemoryRegistry> {
    let registry = MemoryRegistry::new();
    for (url, receiver) in tokens {
        registry
            .insert(NewHoneytoken {
                url: url.to_string(),
                title: format!("Decoy {url}"),
                comment: "integration test".into(),
                notify_receiver: receiver.to_string(),
            })
            .unwrap();
    }
    Arc::new(registry)
}

/// Router of a server built from the parts, with a fixed peer address.
pub fn router(
    config: TrapConfig,
    registry: Arc<MemoryRegistry>,
    notifier: Arc<dyn Notifier>,
    peer: SocketAddr,
) -> Router {
    TrapServer::new(config, registry, notifier)
        .unwrap()
        .router()
        .layer(MockConnectInfo(peer))
}

pub fn peer() -> SocketAddr {
    "10.0.0.1:41000".parse().unwrap()
}

/// Everything the client can observe about a response, minus the
/// per-response `date` header.
#[derive(Debug, PartialEq, Eq)]
pub struct Observed {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

pub async fn send(router: &Router, request: Request<Body>) -> Observed {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = header_list(response.headers());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    Observed {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn header_list(headers: &HeaderMap) -> Vec<(String, String)> {
    let mut list: Vec<(String, String)> = headers
        .iter()
        .filter(|(name, _)| name.as_str() != "date")
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    list.sort();
    list
}

/// In-memory log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
