// Shared test transports and a minimal HTTP/1.1 responder.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use proxybench_core::error::{ProxyBenchError, Result};
use proxybench_core::options::LoadOptions;
use proxybench_http::{ProxyMethod, ProxyRequest, ProxyTransport};
use std::collections::HashSet;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as seen by a test transport or server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// Records every request and answers with a fixed status.
/// Indices listed in `fail_at` produce a transport error instead.
pub struct RecordingTransport {
    pub seen: Mutex<Vec<Recorded>>,
    status: u16,
    fail_at: HashSet<u64>,
}

impl RecordingTransport {
    pub fn ok() -> Arc<Self> {
        Self::with(200, [])
    }

    pub fn with(status: u16, fail_at: impl IntoIterator<Item = u64>) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            status,
            fail_at: fail_at.into_iter().collect(),
        })
    }

    pub fn indices(&self) -> Vec<u64> {
        self.seen
            .lock()
            .iter()
            .map(|r| r.path.trim_start_matches('/').parse().expect("numeric path"))
            .collect()
    }
}

#[async_trait]
impl ProxyTransport for RecordingTransport {
    async fn send(&self, request: ProxyRequest) -> Result<u16> {
        self.seen.lock().push(Recorded {
            method: request.method.as_str().to_string(),
            path: request.url.path().to_string(),
            body: request.body.to_vec(),
        });
        if self.fail_at.contains(&request.index) {
            return Err(ProxyBenchError::transport(
                request.method.as_str(),
                request.index,
                "connection refused",
            ));
        }
        Ok(self.status)
    }
}

/// Every request fails at the transport level.
#[derive(Default)]
pub struct FailingTransport {
    pub calls: AtomicU64,
}

#[async_trait]
impl ProxyTransport for FailingTransport {
    async fn send(&self, request: ProxyRequest) -> Result<u16> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(ProxyBenchError::transport(
            request.method.as_str(),
            request.index,
            "connection reset",
        ))
    }
}

/// Requests never complete, like a hung proxy.
#[derive(Default)]
pub struct HangingTransport {
    pub started: AtomicU64,
}

#[async_trait]
impl ProxyTransport for HangingTransport {
    async fn send(&self, _request: ProxyRequest) -> Result<u16> {
        self.started.fetch_add(1, Ordering::Relaxed);
        std::future::pending::<()>().await;
        Ok(200)
    }
}

/// Records the POSTed index range and answers 200.
#[derive(Default)]
pub struct IndexSink {
    pub indices: Mutex<Vec<u64>>,
}

#[async_trait]
impl ProxyTransport for IndexSink {
    async fn send(&self, request: ProxyRequest) -> Result<u16> {
        assert_eq!(request.method, ProxyMethod::Post);
        assert_eq!(request.url.path(), format!("/{}", request.index));
        self.indices.lock().push(request.index);
        Ok(200)
    }
}

pub fn quiet_options() -> LoadOptions {
    LoadOptions::default()
        .with_echo(false)
        .with_report_interval(Duration::ZERO)
}

/// Poll `cond` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// Minimal keep-alive HTTP/1.1 server answering every request with `status`.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub seen: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl TestProxy {
    pub async fn start(status: u16) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handle = tokio::spawn({
            let seen = Arc::clone(&seen);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let seen = Arc::clone(&seen);
                    tokio::spawn(async move {
                        let _ = serve_connection(stream, seen, status).await;
                    });
                }
            }
        });

        Ok(Self { addr, seen, handle })
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().clone()
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_connection(
    stream: TcpStream,
    seen: Arc<Mutex<Vec<Recorded>>>,
    status: u16,
) -> io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).await? == 0 {
            return Ok(());
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;
        seen.lock().push(Recorded { method, path, body });

        let response = format!("HTTP/1.1 {status} Test\r\ncontent-length: 0\r\n\r\n");
        write.write_all(response.as_bytes()).await?;
    }
}
