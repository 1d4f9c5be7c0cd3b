//! Transport-level rejections
//!
//! A [`Rejection`] ends a request before it reaches the codec. It renders as a
//! `{error, message}` JSON body with the status and any extra headers the
//! rejecting step attached (for example `Retry-After`).

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use serde::Serialize;
use serde_json::{Map, Value};

/// Body of a rejection response
#[derive(Debug, Serialize)]
pub struct RejectionBody {
    /// Machine-readable code
    pub error: &'static str,
    /// Human-readable explanation
    pub message: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A terminal pipeline outcome
#[derive(Debug)]
pub struct Rejection {
    pub status: Status,
    pub code: &'static str,
    pub message: String,
    pub details: Map<String, Value>,
    pub headers: Vec<(&'static str, String)>,
}

impl Rejection {
    pub fn new(status: Status, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: Map::new(),
            headers: Vec::new(),
        }
    }

    /// Add a field to the JSON body
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Add a response header
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Status::BadRequest, code, message)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Status::Unauthorized, code, message)
    }

    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Status::Forbidden, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, code, message)
    }

    pub fn body(&self) -> RejectionBody {
        RejectionBody {
            error: self.code,
            message: self.message.clone(),
            details: self.details.clone(),
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status.code, self.message)
    }
}

impl<'r> Responder<'r, 'static> for Rejection {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut builder = Response::build_from(Json(self.body()).respond_to(request)?);
        builder.status(self.status);
        for (name, value) in self.headers {
            builder.raw_header(name, value);
        }
        builder.ok()
    }
}
