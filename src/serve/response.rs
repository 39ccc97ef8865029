//! HTTP response handlers.

use anyhow::Result;
use std::time::SystemTime;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::cache::{format_http_date, truncate_to_secs};
use crate::utils::mime;

/// Respond with resolved content, stamping `Last-Modified` when known.
pub fn respond_body(
    request: Request,
    virtual_path: &str,
    body: Vec<u8>,
    modified: Option<SystemTime>,
) -> Result<()> {
    let content_type = mime::from_path(std::path::Path::new(virtual_path));

    if is_head_request(&request) {
        return send_head(request, 200, content_type, modified);
    }

    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(200))
        .with_header(make_header("Content-Type", content_type));
    if let Some(time) = modified {
        response = response.with_header(last_modified_header(time));
    }
    request.respond(response)?;
    Ok(())
}

/// Respond 304: the client's copy is current, body suppressed.
pub fn respond_not_modified(request: Request, modified: SystemTime) -> Result<()> {
    let response = Response::empty(StatusCode(304)).with_header(last_modified_header(modified));
    request.respond(response)?;
    Ok(())
}

/// Respond with a plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;

    if is_head_request(&request) {
        return send_head(request, 404, PLAIN, None);
    }

    let response = Response::from_data(b"404 Not Found".to_vec())
        .with_status_code(StatusCode(404))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

/// Respond with a plain 500.
pub fn respond_server_error(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;

    if is_head_request(&request) {
        return send_head(request, 500, PLAIN, None);
    }

    let response = Response::from_data(b"500 Internal Server Error".to_vec())
        .with_status_code(StatusCode(500))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

/// Extract a request header value, case-insensitive.
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(
    request: Request,
    status: u16,
    content_type: &'static str,
    modified: Option<SystemTime>,
) -> Result<()> {
    let mut response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    if let Some(time) = modified {
        response = response.with_header(last_modified_header(time));
    }
    request.respond(response)?;
    Ok(())
}

fn last_modified_header(time: SystemTime) -> Header {
    let value = format_http_date(truncate_to_secs(time));
    Header::from_bytes("Last-Modified", value.as_bytes())
        .unwrap_or_else(|()| make_header("Last-Modified", "Thu, 01 Jan 1970 00:00:00 GMT"))
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
