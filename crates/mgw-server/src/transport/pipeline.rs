//! Request pipeline
//!
//! Every gateway route runs the same ordered steps, each returning either a
//! value or a terminal [`Rejection`]:
//!
//! 1. rate limit
//! 2. security gate
//! 3. shared-secret auth
//! 4. body read, parse, validate, dispatch ([`handle_rpc`])

use mgw_domain::rpc::{ErrorCode, RpcError, RpcResponse, parse};
use rocket::data::{ByteUnit, Data};
use rocket::http::Status;
use serde_json::json;
use tracing::{debug, warn};

use super::guards::RequestMeta;
use super::response::GatewayResponse;
use super::state::GatewayState;
use crate::constants::{PROTOCOL_VERSION_HEADER, RESOURCE_UPDATED_NOTIFICATION, SESSION_ID_HEADER};
use crate::rate_limit::RateDecision;
use crate::rejection::Rejection;
use crate::security::{GateInput, GatePass, GateProfile};
use crate::session::EventKind;

/// A request that passed every transport check
#[derive(Debug, Clone)]
pub struct Admission {
    pub rate: RateDecision,
    pub gate: GatePass,
}

impl Admission {
    /// Rate, version and session headers to echo
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = self.rate.headers();
        if let Some(version) = &self.gate.negotiated_version {
            headers.push((PROTOCOL_VERSION_HEADER, version.clone()));
        }
        if let Some(id) = &self.gate.session_id {
            headers.push((SESSION_ID_HEADER, id.clone()));
        }
        headers
    }
}

/// Run rate limit, gate and auth in order
pub fn admit(
    state: &GatewayState,
    meta: &RequestMeta,
    profile: GateProfile,
    input: GateInput<'_>,
) -> Result<Admission, Rejection> {
    run_checks(state, meta, profile, &input).inspect_err(|rejection| {
        debug!(client = %meta.rate_key(), rejection = %rejection, "Request rejected");
    })
}

fn run_checks(
    state: &GatewayState,
    meta: &RequestMeta,
    profile: GateProfile,
    input: &GateInput<'_>,
) -> Result<Admission, Rejection> {
    let rate = state.limiter.check(&meta.rate_key()).into_result()?;
    let gate = state.gate.check_with(profile, input)?;
    state.auth.check(meta.api_key.as_deref())?;
    Ok(Admission { rate, gate })
}

/// Read the body up to the configured limit
pub async fn read_body(state: &GatewayState, data: Data<'_>) -> Result<String, Rejection> {
    let limit = ByteUnit::from(state.config.server.body_limit_bytes);
    let body = data.open(limit).into_string().await.map_err(|e| {
        warn!(error = %e, "Failed to read request body");
        Rejection::bad_request("unreadable_body", format!("Failed to read request body: {e}"))
    })?;
    if !body.is_complete() {
        return Err(Rejection::new(
            Status::PayloadTooLarge,
            "payload_too_large",
            format!("Request body exceeds {limit}"),
        )
        .with_detail("limitBytes", state.config.server.body_limit_bytes));
    }
    Ok(body.into_inner())
}

/// Result of running one JSON-RPC message
#[derive(Debug, Clone)]
pub struct RpcOutcome {
    pub status: Status,
    /// `None` for notifications
    pub response: Option<RpcResponse>,
}

impl RpcOutcome {
    pub fn into_response(self) -> GatewayResponse {
        match self.response {
            Some(response) => GatewayResponse::json(self.status, response.to_value()),
            None => GatewayResponse::empty(self.status),
        }
    }
}

/// HTTP status for a JSON-RPC error
pub fn status_for(error: &RpcError) -> Status {
    match error.kind() {
        Some(ErrorCode::ResourceNotFound) => Status::NotFound,
        Some(kind) if kind.is_client_fault() => Status::BadRequest,
        _ => Status::InternalServerError,
    }
}

/// Parse, validate and dispatch one message
///
/// Successful mutations are announced to every open session.
pub async fn handle_rpc(state: &GatewayState, raw: &str) -> RpcOutcome {
    let request = match parse(raw) {
        Ok(request) => request,
        Err(failure) => {
            debug!(code = failure.error.code, "Rejected malformed message");
            let response = failure.into_response();
            return RpcOutcome {
                status: response.error().map_or(Status::BadRequest, status_for),
                response: Some(response),
            };
        }
    };

    let changed = state
        .router
        .changed_resource(&request.method, request.params.as_ref());
    let result = state
        .router
        .dispatch(&request.method, request.params.clone())
        .await;

    if let (Ok(_), Some(uri)) = (&result, changed) {
        announce_change(state, &uri);
    }

    if request.is_notification() {
        if let Err(error) = &result {
            debug!(method = %request.method, code = error.code, "Notification failed");
        }
        return RpcOutcome {
            status: Status::Accepted,
            response: None,
        };
    }

    let (status, response) = match result {
        Ok(value) => (Status::Ok, RpcResponse::success(value, request.id)),
        Err(error) => (status_for(&error), RpcResponse::failure(error, request.id)),
    };
    RpcOutcome {
        status,
        response: Some(response.with_tag(request.tag)),
    }
}

fn announce_change(state: &GatewayState, uri: &str) {
    let notification = json!({
        "jsonrpc": "2.0",
        "method": RESOURCE_UPDATED_NOTIFICATION,
        "params": { "uri": uri },
    });
    let delivered = state
        .sessions
        .broadcast(EventKind::Message, &notification.to_string());
    debug!(uri, delivered, "Announced resource change");
}
