//! HTTP response helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::utils::mime::{self, types};

/// Respond with a rendered page.
pub fn respond_page(request: Request, page: &[u8]) -> Result<()> {
    send_body(request, 200, types::HTML, page.to_vec())
}

/// Respond with a static file from disk.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);
    let body = match fs::read(path) {
        Ok(body) => body,
        Err(e) => {
            return respond_error(request, 500, &format!("failed to read {}: {e}", path.display()));
        }
    };
    send_body(request, 200, content_type, body)
}

/// Respond with an in-memory asset.
pub fn respond_bytes(request: Request, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    send_body(request, 200, content_type, body)
}

/// Respond with a structured JSON error body.
pub fn respond_error(request: Request, status: u16, message: &str) -> Result<()> {
    let body = serde_json::json!({
        "statusCode": status,
        "ErrorMessage": message,
    });
    send_body(request, status, types::JSON, body.to_string().into_bytes())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_error(request, 503, "server is shutting down")
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request
        .respond(response)
        .context("failed to write response")
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // both sides are compile-time constants, construction cannot fail
    Header::from_bytes(key, value).unwrap()
}
