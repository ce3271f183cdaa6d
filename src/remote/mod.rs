// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Client for the remote compile service.
//!
//! The service is an opaque collaborator: we POST `{code, profile, method?}`
//! and classify whatever text comes back. A JSON body with `error` is a
//! compile failure, one with `gathered` is a success, anything that does
//! not parse as JSON is passed through verbatim.

use std::fmt;
use std::io;

use serde_json::{json, Value};

use crate::console::{Console, Severity};
use crate::profile::ProfileDescriptor;

pub mod http;

#[derive(Debug)]
pub enum CompileError {
    Endpoint(String),
    Io(io::Error),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endpoint(message) => write!(f, "bad compile endpoint: {message}"),
            Self::Io(err) => write!(f, "compile request failed: {err}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<io::Error> for CompileError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub code: &'a str,
    pub profile: &'a str,
    pub method: Option<&'a str>,
}

impl CompileRequest<'_> {
    pub fn to_body(&self) -> String {
        let mut body = json!({
            "code": self.code,
            "profile": self.profile,
        });
        if let Some(method) = self.method {
            body["method"] = Value::String(method.to_string());
        }
        body.to_string()
    }
}

/// Classified compile-service response.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    Failure(String),
    Success {
        gathered: Vec<(String, Value)>,
        output: Option<Vec<Value>>,
    },
    Raw(String),
    Unrecognized,
}

pub fn classify_response(text: &str) -> CompileOutcome {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return CompileOutcome::Raw(text.to_string());
    };
    if let Some(message) = value
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
    {
        return CompileOutcome::Failure(message.to_string());
    }
    if let Some(gathered) = value.get("gathered").and_then(Value::as_object) {
        let gathered = gathered
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        let output = value.get("output").and_then(Value::as_array).cloned();
        return CompileOutcome::Success { gathered, output };
    }
    CompileOutcome::Unrecognized
}

/// Wire seam: how a request body reaches the service and its response text
/// comes back.
pub trait Transport {
    fn post(&self, body: &str) -> Result<String, CompileError>;
}

pub struct CompileClient<T: Transport> {
    transport: T,
}

impl<T: Transport> CompileClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutcome, CompileError> {
        let text = self.transport.post(&request.to_body())?;
        Ok(classify_response(&text))
    }
}

/// Renders an outcome on the console surface. Gathered values are shown as
/// binary, zero-padded to the profile's addressing width; the first element
/// of each gathered series is the one displayed.
pub fn render_outcome(console: &mut Console, outcome: &CompileOutcome, profile: &ProfileDescriptor) {
    match outcome {
        CompileOutcome::Failure(message) => console.line(Severity::Error, message),
        CompileOutcome::Success { gathered, .. } => {
            console.line(Severity::Success, "The program was compiled without errors");
            for (_, entry) in gathered {
                let cell = entry
                    .as_array()
                    .and_then(|items| items.first())
                    .unwrap_or(entry);
                let rendered = binary_cell(cell, profile.addressing_binary_length);
                log::debug!("{rendered}");
                console.line(Severity::Info, &rendered);
            }
        }
        CompileOutcome::Raw(text) => {
            console.line(Severity::Plain, text);
            console.line(Severity::Error, "An error occurred");
        }
        CompileOutcome::Unrecognized => console.line(Severity::Error, "An error occurred"),
    }
}

fn binary_cell(value: &Value, width: u32) -> String {
    match value.as_u64() {
        Some(number) => format!("{number:0>width$b}", width = width as usize),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_omits_method_when_unset() {
        let request = CompileRequest {
            code: "mov a, 1",
            profile: "potados",
            method: None,
        };
        let body: Value = serde_json::from_str(&request.to_body()).expect("valid json");
        assert_eq!(body["code"], "mov a, 1");
        assert_eq!(body["profile"], "potados");
        assert!(body.get("method").is_none());
    }

    #[test]
    fn body_carries_method_when_set() {
        let request = CompileRequest {
            code: "",
            profile: "pm1",
            method: Some("schematic"),
        };
        let body: Value = serde_json::from_str(&request.to_body()).expect("valid json");
        assert_eq!(body["method"], "schematic");
    }

    #[test]
    fn error_response_classifies_as_failure() {
        let outcome = classify_response(r#"{"error":"unknown instruction 'frob'"}"#);
        assert_eq!(
            outcome,
            CompileOutcome::Failure("unknown instruction 'frob'".to_string())
        );
    }

    #[test]
    fn gathered_response_classifies_as_success() {
        let outcome = classify_response(r#"{"gathered":{"rom":[5,6]},"output":[1]}"#);
        let CompileOutcome::Success { gathered, output } = outcome else {
            panic!("expected success");
        };
        assert_eq!(gathered.len(), 1);
        assert_eq!(gathered[0].0, "rom");
        assert_eq!(output, Some(vec![Value::from(1)]));
    }

    #[test]
    fn non_json_body_is_raw_passthrough() {
        let outcome = classify_response("<html>502 Bad Gateway</html>");
        assert_eq!(
            outcome,
            CompileOutcome::Raw("<html>502 Bad Gateway</html>".to_string())
        );
    }

    #[test]
    fn json_without_known_keys_is_unrecognized() {
        assert_eq!(classify_response(r#"{"status":"ok"}"#), CompileOutcome::Unrecognized);
        // an empty error string is falsy in the service's own client
        assert_eq!(classify_response(r#"{"error":""}"#), CompileOutcome::Unrecognized);
    }

    #[test]
    fn binary_cell_pads_to_addressing_width() {
        assert_eq!(binary_cell(&Value::from(5), 8), "00000101");
        assert_eq!(binary_cell(&Value::from(0), 4), "0000");
        // wider than the padding target: rendered in full
        assert_eq!(binary_cell(&Value::from(300), 4), "100101100");
    }

    #[test]
    fn binary_cell_falls_back_to_verbatim_for_non_numbers() {
        assert_eq!(binary_cell(&Value::from("abc"), 8), "\"abc\"");
    }
}
