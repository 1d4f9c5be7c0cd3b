//! JSON error catchers
//!
//! Rocket-level failures (no matching route, guard errors, panics) render
//! the same `{error, message}` body as pipeline rejections.

use rocket::serde::json::Json;
use rocket::{Request, catch};

use crate::rejection::RejectionBody;

fn body(error: &'static str, message: String) -> Json<RejectionBody> {
    Json(RejectionBody {
        error,
        message,
        details: serde_json::Map::new(),
    })
}

#[catch(400)]
pub fn bad_request(request: &Request<'_>) -> Json<RejectionBody> {
    body("bad_request", format!("Malformed request to {}", request.uri()))
}

#[catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<RejectionBody> {
    body(
        "not_found",
        format!("No route for {} {}", request.method(), request.uri().path()),
    )
}

#[catch(413)]
pub fn payload_too_large(_request: &Request<'_>) -> Json<RejectionBody> {
    body("payload_too_large", "Request body is too large".to_string())
}

#[catch(422)]
pub fn unprocessable(request: &Request<'_>) -> Json<RejectionBody> {
    body(
        "unprocessable_entity",
        format!("Could not process request to {}", request.uri().path()),
    )
}

#[catch(500)]
pub fn internal_error(_request: &Request<'_>) -> Json<RejectionBody> {
    body("internal_error", "The server failed to handle the request".to_string())
}
