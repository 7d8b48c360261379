//! Shared utilities for integration tests: a programmable mock ledger.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the mock ledger.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query string.
    pub target: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }
}

/// Handle to a running mock ledger.
#[derive(Clone)]
pub struct MockLedger {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }
}

/// Start a mock ledger on an ephemeral port. `route` maps each request to
/// an HTTP status and a JSON body. Status 0 closes the connection without
/// answering.
pub async fn start_mock_ledger<F>(route: F) -> MockLedger
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    start_delayed_mock_ledger(Duration::ZERO, route).await
}

/// Like `start_mock_ledger`, but holds every response for `delay`, the way
/// a ledger holds a status long-poll.
pub async fn start_delayed_mock_ledger<F>(delay: Duration, route: F) -> MockLedger
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let route = Arc::new(route);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let route = route.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        serve_one(socket, delay, route.as_ref(), &recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockLedger { addr, requests }
}

async fn serve_one<F>(
    mut socket: TcpStream,
    delay: Duration,
    route: &F,
    recorded: &Mutex<Vec<RecordedRequest>>,
) where
    F: Fn(&RecordedRequest) -> (u16, String),
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    recorded.lock().unwrap().push(request.clone());

    let (status, body) = route(&request);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if status == 0 {
        let _ = socket.shutdown().await;
        return;
    }
    let status_text = match status {
        200 => "200 OK",
        202 => "202 Accepted",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "content-type" => content_type = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        content_type,
        body,
    })
}

/// Standard submission response pointing at `batch_id`.
#[allow(dead_code)]
pub fn link_response(batch_id: &str) -> String {
    format!(
        r#"{{"link": "http://ledger.local:8008/batch_statuses?id={}"}}"#,
        batch_id
    )
}

/// Status response with a single entry.
#[allow(dead_code)]
pub fn status_response(batch_id: &str, status: &str) -> String {
    format!(
        r#"{{"data": [{{"id": "{}", "status": "{}", "invalid_transactions": []}}]}}"#,
        batch_id, status
    )
}
