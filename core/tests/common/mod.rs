//! Shared helpers for tests that talk to a live mock server.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use todo_core::{ApiClient, ClientConfig, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};

/// Start the mock server on a random port and return its base URL.
///
/// The server runs on its own thread and runtime so it serves both sync and
/// async tests.
pub fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Delegates to ureq and records every request it executes.
#[derive(Default)]
pub struct RecordingTransport {
    inner: UreqTransport,
    pub seen: Mutex<Vec<HttpRequest>>,
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().push(request.clone());
        self.inner.execute(request)
    }
}

/// Collected notification messages.
pub type Notes = Arc<Mutex<Vec<String>>>;

pub struct Harness {
    pub api: Arc<ApiClient>,
    pub transport: Arc<RecordingTransport>,
    pub notes: Notes,
}

pub fn harness(base_url: &str) -> Harness {
    let transport = Arc::new(RecordingTransport::default());
    let notes: Notes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notes);
    let config = ClientConfig::new(base_url).unwrap();
    let api = ApiClient::new(
        &config,
        transport.clone(),
        Arc::new(move |message: &str| sink.lock().push(message.to_string())),
    );
    Harness {
        api: Arc::new(api),
        transport,
        notes,
    }
}
