//! Mock storage host for E2E tests.
//!
//! Starts an in-process HTTP server under `/storage/` that serves a
//! configurable set of files and records every requested filename.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned reply for one filename.
#[derive(Clone)]
pub struct MockFile {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockFile {
    pub fn pdf(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Shared state for the mock storage host.
#[derive(Default)]
pub struct MockStorageState {
    pub files: HashMap<String, MockFile>,
    /// Reply for names not in `files` (404 when unset).
    pub fallback: Option<MockFile>,
    /// Decoded filenames, in arrival order.
    pub requests: Vec<String>,
    /// Raw (still percent-encoded) request paths.
    pub raw_paths: Vec<String>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

async fn serve_file(req: HttpRequest, state: web::Data<Arc<Mutex<MockStorageState>>>) -> HttpResponse {
    let raw = req.path().to_string();
    let encoded = raw.strip_prefix("/storage/").unwrap_or(&raw).to_string();
    let name = urlencoding::decode(&encoded)
        .map(|n| n.into_owned())
        .unwrap_or(encoded);

    let (reply, in_flight, peak) = {
        let mut state = state.lock().unwrap();
        state.raw_paths.push(raw);
        state.requests.push(name.clone());
        let reply = state
            .files
            .get(&name)
            .cloned()
            .or_else(|| state.fallback.clone())
            .unwrap_or_else(|| MockFile::status(404));
        (reply, state.in_flight.clone(), state.peak_in_flight.clone())
    };

    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    peak.fetch_max(now, Ordering::SeqCst);

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    in_flight.fetch_sub(1, Ordering::SeqCst);

    let status = actix_web::http::StatusCode::from_u16(reply.status).unwrap();
    HttpResponse::build(status)
        .content_type("application/pdf")
        .body(reply.body)
}

/// Mock storage host serving `/storage/{filename}`.
pub struct MockStorage {
    pub base_url: String,
    pub state: Arc<Mutex<MockStorageState>>,
}

impl MockStorage {
    /// Start the mock on an ephemeral port with the given files.
    pub async fn start(files: Vec<(&str, MockFile)>) -> Self {
        let state = Arc::new(Mutex::new(MockStorageState {
            files: files
                .into_iter()
                .map(|(name, file)| (name.to_string(), file))
                .collect(),
            ..Default::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}/storage/", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .default_service(web::route().to(serve_file))
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget — server lives for the process lifetime
        tokio::spawn(server);

        MockStorage { base_url, state }
    }

    /// Reply for every filename not explicitly registered.
    pub fn set_fallback(&self, file: MockFile) {
        self.state.lock().unwrap().fallback = Some(file);
    }

    /// Decoded filenames requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Raw request paths received so far.
    pub fn raw_paths(&self) -> Vec<String> {
        self.state.lock().unwrap().raw_paths.clone()
    }

    /// Highest number of requests served at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.state.lock().unwrap().peak_in_flight.load(Ordering::SeqCst)
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/storage/", port)
}
