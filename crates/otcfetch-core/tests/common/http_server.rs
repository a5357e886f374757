//! Minimal HTTP/1.1 server for fetch-policy tests.
//!
//! Serves fixed bodies by absolute path, a configurable status for others,
//! counts every request, and records raw request heads so tests can assert
//! on headers sent.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned response for one route.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(body: &[u8]) -> Self {
        Route {
            status: 200,
            body: body.to_vec(),
        }
    }

    pub fn status(status: u32) -> Self {
        Route {
            status,
            body: Vec::new(),
        }
    }
}

pub struct TestServer {
    /// Base URL with trailing slash, e.g. `http://127.0.0.1:34567/`.
    pub base_url: String,
    requests: Arc<AtomicUsize>,
    heads: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Raw request heads (request line + headers) seen so far.
    pub fn request_heads(&self) -> Vec<String> {
        self.heads.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Paths not in `routes` get a
/// plain 404. The server runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(AtomicUsize::new(0));
    let heads = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(routes);

    let requests_bg = Arc::clone(&requests);
    let heads_bg = Arc::clone(&heads);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests_bg);
            let heads = Arc::clone(&heads_bg);
            thread::spawn(move || handle(stream, &routes, &requests, &heads));
        }
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        requests,
        heads,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    requests: &AtomicUsize,
    heads: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    requests.fetch_add(1, Ordering::SeqCst);
    heads.lock().unwrap().push(request.to_string());

    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    let route = routes
        .get(path)
        .cloned()
        .unwrap_or_else(|| Route::status(404));
    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Response",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason,
        route.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}
