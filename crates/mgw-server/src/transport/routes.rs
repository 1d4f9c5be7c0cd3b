//! Gateway routes
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /mcp` | JSON-RPC call or notification |
//! | `GET /mcp` | Open a session event stream |
//! | `DELETE /mcp` | Close a session |
//! | `GET /sse` | Legacy stream; first event names the message endpoint |
//! | `POST /messages?sessionId=` | Legacy message bridge |
//! | `GET /health` | Liveness, unauthenticated and unlimited |

use std::collections::HashMap;

use futures::Stream;
use rocket::data::Data;
use rocket::http::Status;
use rocket::response::stream::Event;
use rocket::serde::json::Json;
use rocket::{FromForm, State, delete, get, post};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::guards::RequestMeta;
use super::pipeline::{admit, handle_rpc, read_body};
use super::response::{GatewayResponse, SseResponse};
use super::sse::frame_stream;
use super::state::GatewayState;
use crate::constants::{
    LEGACY_MESSAGES_PATH, LEGACY_SESSION_QUERY, PROTOCOL_VERSION_HEADER, SERVER_VERSION,
    SESSION_ID_HEADER,
};
use crate::rejection::Rejection;
use crate::security::GateProfile;
use crate::session::{self, ChannelTransport, EventKind};

type Headers = Vec<(&'static str, String)>;

/// Handle one JSON-RPC message
#[post("/mcp", data = "<body>")]
pub async fn mcp_post(
    state: &State<GatewayState>,
    meta: RequestMeta,
    body: Data<'_>,
) -> Result<GatewayResponse, Rejection> {
    let admission = admit(state, &meta, state.gate.profile(), meta.gate_input(true, false))?;
    let raw = read_body(state, body).await?;
    if let Some(id) = &admission.gate.session_id {
        state.sessions.touch(id);
    }
    let outcome = handle_rpc(state, &raw).await;
    Ok(outcome.into_response().with_headers(admission.headers()))
}

/// Open (or reopen) a session stream
#[get("/mcp")]
pub fn mcp_stream(
    state: &State<GatewayState>,
    meta: RequestMeta,
) -> Result<SseResponse<impl Stream<Item = Event> + use<>>, Rejection> {
    let admission = admit(state, &meta, state.gate.profile(), meta.gate_input(false, true))?;
    if !meta.accepts_event_stream() {
        return Err(Rejection::new(
            Status::NotAcceptable,
            "not_acceptable",
            "Accept must include text/event-stream",
        ));
    }

    // Only a live id is reused; anything else starts a fresh session.
    let id = admission
        .gate
        .session_id
        .clone()
        .filter(|id| state.sessions.contains(id))
        .unwrap_or_else(session::generate_id);

    let mut headers = admission.rate.headers();
    if let Some(version) = &admission.gate.negotiated_version {
        headers.push((PROTOCOL_VERSION_HEADER, version.clone()));
    }
    Ok(open_stream(state, &meta, id, headers))
}

/// Close a session
#[delete("/mcp")]
pub fn mcp_delete(
    state: &State<GatewayState>,
    meta: RequestMeta,
) -> Result<GatewayResponse, Rejection> {
    let admission = admit(state, &meta, state.gate.profile(), meta.gate_input(false, false))?;
    let id = admission.gate.session_id.clone().ok_or_else(|| {
        Rejection::bad_request(
            "missing_session_id",
            format!("The {SESSION_ID_HEADER} header is required"),
        )
    })?;
    if !state.sessions.close(&id) {
        return Err(Rejection::not_found(
            "session_not_found",
            format!("Session '{id}' does not exist"),
        ));
    }
    Ok(GatewayResponse::json(Status::Ok, json!({ "closed": id })).with_headers(admission.headers()))
}

/// Legacy discovery stream
#[get("/sse")]
pub fn legacy_stream(
    state: &State<GatewayState>,
    meta: RequestMeta,
) -> Result<SseResponse<impl Stream<Item = Event> + use<>>, Rejection> {
    let admission = admit(state, &meta, GateProfile::Legacy, meta.gate_input(false, true))?;
    let id = session::generate_id();
    let endpoint = format!(
        "{}{LEGACY_MESSAGES_PATH}?{LEGACY_SESSION_QUERY}={id}",
        public_base(state, &meta)
    );

    let response = open_stream(state, &meta, id.clone(), admission.rate.headers());
    state.sessions.send(&id, EventKind::Endpoint, endpoint, None);
    Ok(response)
}

#[derive(Debug, FromForm)]
pub struct LegacyQuery {
    #[field(name = "sessionId")]
    pub session_id: Option<String>,
}

/// Legacy message bridge
///
/// With a live `sessionId` the response goes out on that session's stream
/// and the POST answers 202; otherwise it is returned inline.
#[post("/messages?<query..>", data = "<body>")]
pub async fn legacy_messages(
    state: &State<GatewayState>,
    meta: RequestMeta,
    query: LegacyQuery,
    body: Data<'_>,
) -> Result<GatewayResponse, Rejection> {
    let admission = admit(state, &meta, GateProfile::Legacy, meta.gate_input(true, false))?;
    let raw = read_body(state, body).await?;
    let live_session = query.session_id.filter(|id| state.sessions.touch(id));

    let outcome = handle_rpc(state, &raw).await;
    if let (Some(id), Some(response)) = (&live_session, &outcome.response) {
        let payload = response.to_value().to_string();
        if state.sessions.send(id, EventKind::Message, payload, None) {
            return Ok(GatewayResponse::empty(Status::Accepted)
                .with_headers(admission.rate.headers()));
        }
        debug!(session_id = %id, "Session gone, answering inline");
    }
    Ok(outcome.into_response().with_headers(admission.rate.headers()))
}

/// Liveness probe
#[get("/health")]
pub fn health(state: &State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptimeSeconds": state.uptime().as_secs(),
        "sessions": state.sessions.count(),
        "version": SERVER_VERSION,
    }))
}

fn open_stream(
    state: &GatewayState,
    meta: &RequestMeta,
    id: String,
    mut headers: Headers,
) -> SseResponse<impl Stream<Item = Event> + use<>> {
    let mut metadata = HashMap::new();
    if let Some(ip) = meta.client_ip {
        metadata.insert("remote_addr".to_string(), ip.to_string());
    }
    if let Some(agent) = &meta.user_agent {
        metadata.insert("user_agent".to_string(), agent.clone());
    }
    // Recorded only; frames are not replayed.
    if let Some(last_event_id) = &meta.last_event_id {
        metadata.insert("last_event_id".to_string(), last_event_id.clone());
    }

    let (transport, receiver) = ChannelTransport::pair();
    let opened = state.sessions.open(id.clone(), transport, metadata);
    info!(session_id = %opened.id, remote = ?meta.client_ip, "Stream opened");

    headers.extend(session::stream_headers(&id));
    SseResponse::new(frame_stream(receiver, id), headers)
}

/// Base URL clients should use to reach this server
fn public_base(state: &GatewayState, meta: &RequestMeta) -> String {
    if let Some(url) = &state.config.server.public_url {
        return url.trim_end_matches('/').to_string();
    }
    let bind = state.config.server.socket_addr();
    match &meta.host {
        Some(host) => {
            let candidate = format!("http://{host}");
            if state.gate.allows_origin(&candidate) {
                debug!(host = %host, "No public_url configured, using Host header");
                candidate
            } else {
                debug!(host = %host, bind = %bind, "Host not whitelisted, using bind address");
                format!("http://{bind}")
            }
        }
        None => {
            debug!(bind = %bind, "No public_url or Host header, using bind address");
            format!("http://{bind}")
        }
    }
}
