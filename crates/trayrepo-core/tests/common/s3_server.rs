//! Minimal HTTP/1.1 server that answers path-style S3 GETs for integration tests.
//!
//! Serves a fixed set of objects keyed by request path (`/<bucket>/<key>`).
//! Unknown paths get a 404 with an S3 `NoSuchKey` error document. Every
//! request is recorded so tests can assert on what was sent.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// One received request: method, path and `Authorization` header (if any).
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub amz_date: Option<String>,
}

/// Canned response for a path.
#[derive(Debug, Clone)]
pub enum Reply {
    Object(Vec<u8>),
    Error {
        status: &'static str,
        code: &'static str,
    },
}

pub struct FakeS3 {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeS3 {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(routes: HashMap<String, Reply>) -> FakeS3 {
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
    FakeS3 {
        endpoint: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Reply>,
    log: &Mutex<Vec<Recorded>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let request = match std::str::from_utf8(&raw) {
        Ok(s) => s,
        Err(_) => return,
    };

    let recorded = parse_request(request);
    let path = recorded.path.clone();
    log.lock().unwrap().push(recorded);

    let (status, body) = match routes.get(&path) {
        Some(Reply::Object(body)) => ("200 OK".to_string(), body.clone()),
        Some(Reply::Error { status, code }) => (status.to_string(), error_document(code, &path)),
        None => ("404 Not Found".to_string(), error_document("NoSuchKey", &path)),
    };
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

fn error_document(code: &str, path: &str) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>{}</Code><Message>fake s3 refused {}</Message></Error>",
        code, path
    )
    .into_bytes()
}

fn parse_request(request: &str) -> Recorded {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("").to_string();
    let mut authorization = None;
    let mut amz_date = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            } else if name.eq_ignore_ascii_case("x-amz-date") {
                amz_date = Some(value.trim().to_string());
            }
        }
    }
    Recorded {
        method,
        path,
        authorization,
        amz_date,
    }
}
