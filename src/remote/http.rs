// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Minimal HTTP/1.1 transport for the compile endpoint.
//!
//! One POST per request over a fresh connection, `Connection: close`. The
//! response body is returned as text whatever the status code is; the
//! caller classifies it.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;

use super::{CompileError, Transport};

pub struct HttpTransport {
    host: String,
    port: u16,
    path: String,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self, CompileError> {
        let Some(rest) = endpoint.strip_prefix("http://") else {
            return Err(CompileError::Endpoint(format!(
                "'{endpoint}' is not an http:// URL"
            )));
        };
        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    CompileError::Endpoint(format!("'{authority}' has an invalid port"))
                })?;
                (host, port)
            }
            None => (authority, 80),
        };
        if host.is_empty() {
            return Err(CompileError::Endpoint(format!(
                "'{endpoint}' has no host"
            )));
        }
        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
            endpoint: endpoint.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn post(&self, body: &str) -> Result<String, CompileError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))?;
        let mut writer = stream.try_clone()?;
        write!(
            writer,
            "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.path,
            self.host,
            body.len(),
            body
        )?;
        writer.flush()?;

        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line)?;
        log::debug!("{}: {}", self.endpoint, status_line.trim_end());

        let mut content_length: Option<usize> = None;
        loop {
            let mut line = String::new();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                break;
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                break;
            }
            if let Some((name, value)) = trimmed.split_once(':') {
                if name.eq_ignore_ascii_case("Content-Length") {
                    content_length = value.trim().parse::<usize>().ok();
                }
            }
        }

        let body = match content_length {
            Some(length) => {
                let mut buf = vec![0u8; length];
                reader.read_exact(&mut buf)?;
                buf
            }
            None => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                buf
            }
        };
        Ok(String::from_utf8_lossy(&body).to_string())
    }
}
