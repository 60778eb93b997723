//! In-process fake backend serving `/actions/fetch_emails`
//!
//! Speaks just enough HTTP/1.1 for `reqwest`: it reads the request
//! line, the headers and a `Content-Length` body, writes the canned
//! response with `Connection: close`, and drops the connection.

use super::io::write_bytes;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// The response every request receives.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Written after `Content-Type`, in order; names may repeat.
    pub extra_headers: Vec<(&'static str, String)>,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
            extra_headers: Vec::new(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
            extra_headers: Vec::new(),
        }
    }

    /// Add a response header; call repeatedly to send a name twice.
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.extra_headers.push((name, value.to_string()));
        self
    }
}

/// A request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A fake backend on localhost with an OS-assigned port.
pub struct FakeBackend {
    port: u16,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    /// Background accept loop, aborted on drop.
    handle: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Start a fake backend that answers every request with `response`.
    ///
    /// The server runs until the `FakeBackend` is dropped.
    pub async fn start(response: CannedResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();

        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let response = response.clone();
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    handle_connection(stream, &response, &log).await;
                });
            }
        });

        Self {
            port,
            received,
            handle,
        }
    }

    /// The port the server is listening on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Base URL to hand to `ProbeConfig`.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Every request received so far.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Read one request, record it, then answer it.
///
/// The request is logged before the response is written.
async fn handle_connection(
    stream: TcpStream,
    response: &CannedResponse,
    log: &Mutex<Vec<ReceivedRequest>>,
) -> Option<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await.ok()?;

    log.lock().unwrap().push(ReceivedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let extra: String = response
        .extra_headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\r\n"))
        .collect();

    let raw = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: {}\r\n\
         {}\
         Content-Length: {}\r\n\
         X-Fake-Backend: 1\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        response.status,
        reason(response.status),
        response.content_type,
        extra,
        response.body.len(),
        response.body,
    );
    write_bytes(&mut reader, raw.as_bytes()).await.ok()
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
