#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use regview_core::error::{RegviewError, Result};
use regview_core::{Fetch, FetchResponse};
use tracing_subscriber::fmt::MakeWriter;

enum Reply {
    Response(FetchResponse),
    Refused(String),
}

/// Fetch double: answers every GET with one canned reply and records the URLs.
pub struct FakeFetch {
    reply: Reply,
    calls: Mutex<Vec<String>>,
}

impl FakeFetch {
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            reply: Reply::Response(FetchResponse::new(status, body.as_bytes())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            reply: Reply::Refused(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        match &self.reply {
            Reply::Response(r) => Ok(r.clone()),
            Reply::Refused(reason) => Err(RegviewError::Transport(reason.clone())),
        }
    }
}

/// Shared buffer the fmt subscriber writes into.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's log events into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buf = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buf, guard)
}
