//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses keyed by request path (query string ignored),
//! answers 404 for anything else, and records every request target.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

pub struct FilingServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FilingServer {
    /// Starts a server in a background thread. Runs until the process exits.
    pub fn start(routes: HashMap<String, Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let log = Arc::clone(&log);
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            requests,
        }
    }

    /// Request targets seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path (without query) equals `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|t| t.split('?').next() == Some(path))
            .count()
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Canned>, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let (status, body): (&str, &[u8]) = match routes.get(path) {
        Some(Canned::Body(body)) => ("200 OK", body.as_slice()),
        Some(Canned::Status(500)) => ("500 Internal Server Error", &b"boom"[..]),
        Some(Canned::Status(403)) => ("403 Forbidden", &b"forbidden"[..]),
        Some(Canned::Status(_)) | None => ("404 Not Found", &b"<html>not found</html>"[..]),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
