//! HTTP response helpers.

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::types::{HTML, JSON, PDF, PLAIN};

pub fn respond_html(request: Request, body: String) -> Result<()> {
    send_body(request, 200, HTML, body.into_bytes())
}

pub fn respond_json(request: Request, body: &impl serde::Serialize) -> Result<()> {
    let body = serde_json::to_vec(body)?;
    send_body(request, 200, JSON, body)
}

pub fn respond_pdf(request: Request, body: Vec<u8>) -> Result<()> {
    send_body(request, 200, PDF, body)
}

/// 204 for control API calls that return nothing.
pub fn respond_no_content(request: Request) -> Result<()> {
    request.respond(Response::empty(StatusCode(204)))?;
    Ok(())
}

pub fn respond_not_found(request: Request, message: &str) -> Result<()> {
    send_body(request, 404, PLAIN, message.as_bytes().to_vec())
}

pub fn respond_bad_request(request: Request, message: &str) -> Result<()> {
    send_body(request, 400, PLAIN, message.as_bytes().to_vec())
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_body(request, 405, PLAIN, b"405 Method Not Allowed".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    if is_head_request(&request) {
        let response =
            Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
        request.respond(response)?;
        return Ok(());
    }

    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-store"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).expect("static header is valid")
}
