#![allow(dead_code)]

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// One-shot HTTP mock standing in for the remote compile service: accepts
/// a single connection, records the request body, answers with a canned
/// response, and closes.
pub struct MockCompileService {
    pub endpoint: String,
    handle: JoinHandle<Option<String>>,
}

impl MockCompileService {
    pub fn respond_with(status_line: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock service");
        let port = listener.local_addr().expect("local addr").port();
        let status_line = status_line.to_string();
        let response_body = body.to_string();
        let handle = thread::spawn(move || serve_once(&listener, &status_line, &response_body));
        Self {
            endpoint: format!("http://127.0.0.1:{port}/api"),
            handle,
        }
    }

    /// Joins the service thread and returns the request body it saw.
    pub fn received_body(self) -> Option<String> {
        self.handle.join().expect("mock service thread")
    }
}

fn serve_once(listener: &TcpListener, status_line: &str, response_body: &str) -> Option<String> {
    let (stream, _) = listener.accept().ok()?;
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut request_body = vec![0u8; content_length];
    reader.read_exact(&mut request_body).ok()?;

    let mut stream = stream;
    let _ = write!(
        stream,
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
        response_body.len()
    );
    String::from_utf8(request_body).ok()
}

/// Console sink that can be inspected after the console is done with it.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
