#![allow(dead_code)]

use async_trait::async_trait;
use rss_reblog::{
    FeedItem, GenerationRequest, LlmAdapter, NoteRequest, Publisher, ReblogError, Result,
};
use std::sync::{Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn item(title: &str, link: &str, published: &str) -> FeedItem {
    FeedItem {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        summary: Some(format!("<p>About <b>{}</b></p>", title)),
        published: Some(published.to_string()),
        updated: None,
    }
}

/// Publisher that remembers every note it was asked to create.
#[derive(Default)]
pub struct RecordingPublisher {
    pub notes: Mutex<Vec<NoteRequest>>,
}

impl RecordingPublisher {
    pub fn texts(&self) -> Vec<String> {
        self.notes.lock().unwrap().iter().map(|n| n.text.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.notes.lock().unwrap().len()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    fn publisher_name(&self) -> String {
        "recording".to_string()
    }

    async fn publish(&self, note: &NoteRequest) -> Result<()> {
        self.notes.lock().unwrap().push(note.clone());
        Ok(())
    }
}

/// Publisher that succeeds `ok_before_failure` times and then fails.
pub struct FailingPublisher {
    pub ok_before_failure: usize,
    pub attempts: Mutex<usize>,
}

impl FailingPublisher {
    pub fn new(ok_before_failure: usize) -> Self {
        Self {
            ok_before_failure,
            attempts: Mutex::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Publisher for FailingPublisher {
    fn publisher_name(&self) -> String {
        "failing".to_string()
    }

    async fn publish(&self, _note: &NoteRequest) -> Result<()> {
        let mut attempts = self.attempts.lock().unwrap();
        *attempts += 1;
        if *attempts > self.ok_before_failure {
            return Err(ReblogError::Transport("Sharkey responded 500: boom".to_string()));
        }
        Ok(())
    }
}

/// LLM adapter that always fails.
pub struct FailingLlm;

#[async_trait]
impl LlmAdapter for FailingLlm {
    fn adapter_name(&self) -> String {
        "failing".to_string()
    }

    async fn generate_status(&self, _request: &GenerationRequest) -> Result<Option<String>> {
        Err(ReblogError::GenerationUnavailable("connection refused".to_string()))
    }
}

/// LLM adapter that answers with a fixed (possibly blank) text.
pub struct FixedLlm(pub Option<String>);

#[async_trait]
impl LlmAdapter for FixedLlm {
    fn adapter_name(&self) -> String {
        "fixed".to_string()
    }

    async fn generate_status(&self, _request: &GenerationRequest) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// One HTTP request as seen by [`serve_once`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Serve exactly one HTTP/1.1 response on a loopback port.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and a handle that yields
/// the request the client sent.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        head,
        body: String::from_utf8_lossy(&buf[head_end..]).to_string(),
    }
}
