//! Shared utilities for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use traffic_synth::catalog::{FlowDefinition, ScenarioEntry};
use traffic_synth::config::DemoConfig;
use traffic_synth::demo::{self, DemoState};
use traffic_synth::flow::{FlowStep, FlowStepError, ResourceClient, ResourceId};
use traffic_synth::lifecycle::Shutdown;
use traffic_synth::sampler::TickContext;
use traffic_synth::sink::{Delivery, EmissionSink, SinkError, SinkResult};

/// One observed sink call.
#[derive(Debug, Clone)]
pub struct Emission {
    pub entry_id: String,
    pub tick: u64,
    pub at: Instant,
}

/// Sink that records every call, optionally sleeping and failing on one id.
#[derive(Default)]
pub struct RecordingSink {
    pub delay: Duration,
    pub fail_on: Option<String>,
    pub emissions: Mutex<Vec<Emission>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            fail_on: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<Emission> {
        self.emissions.lock().unwrap().clone()
    }

    /// First call time of each tick, in tick order.
    pub fn tick_starts(&self) -> Vec<(u64, Instant)> {
        let mut starts: Vec<(u64, Instant)> = Vec::new();
        for e in self.snapshot() {
            match starts.iter_mut().find(|(tick, _)| *tick == e.tick) {
                Some((_, at)) if e.at < *at => *at = e.at,
                Some(_) => {}
                None => starts.push((e.tick, e.at)),
            }
        }
        starts.sort_by_key(|(tick, _)| *tick);
        starts
    }
}

#[async_trait]
impl EmissionSink for RecordingSink {
    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> SinkResult {
        self.emissions.lock().unwrap().push(Emission {
            entry_id: entry.id.clone(),
            tick: ctx.sequence,
            at: Instant::now(),
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_on.as_deref() == Some(entry.id.as_str()) {
            return Err(SinkError::Other("injected failure".into()));
        }
        Ok(Delivery::logged())
    }
}

/// Resource client that records calls and can slow down or fail steps.
#[derive(Default)]
pub struct RecordingResources {
    pub step_delay: Duration,
    pub create_result: Option<Result<ResourceId, FlowStepError>>,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    async fn pause(&self) {
        if !self.step_delay.is_zero() {
            tokio::time::sleep(self.step_delay).await;
        }
    }
}

#[async_trait]
impl ResourceClient for RecordingResources {
    async fn create(&self, _flow: &FlowDefinition, _ctx: &TickContext) -> Result<ResourceId, FlowStepError> {
        self.calls.lock().unwrap().push("create".into());
        self.pause().await;
        self.create_result
            .clone()
            .unwrap_or_else(|| Ok(ResourceId::from("42")))
    }

    async fn update(&self, _flow: &FlowDefinition, id: &ResourceId, _ctx: &TickContext) -> Result<(), FlowStepError> {
        self.calls.lock().unwrap().push(format!("update:{}", id));
        self.pause().await;
        Ok(())
    }

    async fn delete(&self, _flow: &FlowDefinition, id: &ResourceId, _ctx: &TickContext) -> Result<(), FlowStepError> {
        self.calls.lock().unwrap().push(format!("delete:{}", id));
        self.pause().await;
        Ok(())
    }
}

pub fn failing_create(status: u16) -> Option<Result<ResourceId, FlowStepError>> {
    Some(Err(FlowStepError::Status {
        step: FlowStep::Create,
        status,
    }))
}

/// Serve the demo target on an ephemeral port.
pub async fn start_demo_target() -> (SocketAddr, DemoState, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = DemoState::new(&DemoConfig {
        bind_address: addr.to_string(),
        movies_delay_ms: 0,
    });
    let shutdown = Shutdown::new();

    let served = state.clone();
    let stop = shutdown.wait();
    tokio::spawn(async move {
        let _ = demo::serve(listener, served, stop).await;
    });

    (addr, state, shutdown)
}

/// One request seen by a programmable backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Lower-cased header names.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `METHOD /path`
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A raw-HTTP backend whose responses come from a closure.
pub struct ProgrammableBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ProgrammableBackend {
    /// Requests in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::line).collect()
    }
}

/// Start a programmable raw-HTTP backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> ProgrammableBackend
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let request = match read_request(&mut socket).await {
                            Some(request) => request,
                            None => return,
                        };
                        recorded.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    ProgrammableBackend { addr, requests }
}

/// Read the request head and any `Content-Length` body.
async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&raw[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut start = lines.next().unwrap_or_default().split_whitespace();
    let method = start.next().unwrap_or_default().to_string();
    let path = start.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let body_len: usize = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0);
    let mut received = raw.len() - (head_end + 4);
    while received < body_len {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            break;
        }
        received += n;
    }

    Some(RecordedRequest { method, path, headers })
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
