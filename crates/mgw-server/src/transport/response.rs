//! Responders for gateway routes

use futures::Stream;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::stream::{Event, EventStream};
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use serde_json::Value;

/// JSON (or empty) response with extra headers
#[derive(Debug)]
pub struct GatewayResponse {
    pub status: Status,
    pub body: Option<Value>,
    pub headers: Vec<(&'static str, String)>,
}

impl GatewayResponse {
    pub fn json(status: Status, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    pub fn empty(status: Status) -> Self {
        Self {
            status,
            body: None,
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Vec<(&'static str, String)>) -> Self {
        self.headers.extend(headers);
        self
    }
}

impl<'r> Responder<'r, 'static> for GatewayResponse {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut builder = match self.body {
            Some(body) => Response::build_from(Json(body).respond_to(request)?),
            None => Response::build(),
        };
        builder.status(self.status);
        for (name, value) in self.headers {
            builder.raw_header(name, value);
        }
        builder.ok()
    }
}

/// Event stream with session headers
pub struct SseResponse<S> {
    stream: EventStream<S>,
    headers: Vec<(&'static str, String)>,
}

impl<S> SseResponse<S> {
    pub fn new(stream: EventStream<S>, headers: Vec<(&'static str, String)>) -> Self {
        Self { stream, headers }
    }
}

impl<'r, S> Responder<'r, 'r> for SseResponse<S>
where
    S: Stream<Item = Event> + Send + 'r,
{
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'r> {
        let mut builder = Response::build_from(self.stream.respond_to(request)?);
        for (name, value) in self.headers {
            builder.raw_header(name, value);
        }
        builder.ok()
    }
}
