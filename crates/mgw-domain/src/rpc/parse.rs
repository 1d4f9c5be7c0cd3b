//! Raw body parsing
//!
//! Rejections map onto the taxonomy as follows:
//!
//! | Input | Code |
//! |-------|------|
//! | not JSON | `ParseError` |
//! | not an object (including batches) | `InvalidRequest` |
//! | `id` present but not string / number / null | `InvalidRequest` |
//! | tag missing or not `"2.0"` | `InvalidRequest` |
//! | `method` missing, not a string, or empty | `InvalidRequest` |
//! | `params` present but not an object | `InvalidRequest` |
//!
//! Once the id has been read it is carried on the failure so the error
//! response can echo it.

use serde_json::{Map, Value};

use super::message::{RequestId, RpcError, RpcRequest, RpcResponse, TagKey};
use crate::constants::{JSONRPC_TAG_KEY, JSONRPC_VERSION, PROTOCOL_TAG_ALIAS_KEY};

/// A request that could not be accepted
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// Error to report
    pub error: RpcError,
    /// Id recovered before the failure, if any
    pub id: Option<RequestId>,
    /// Tag key recovered before the failure
    pub tag: TagKey,
}

impl ParseFailure {
    fn new(error: RpcError) -> Self {
        Self {
            error,
            id: None,
            tag: TagKey::Jsonrpc,
        }
    }

    /// Build the error response for this failure
    pub fn into_response(self) -> RpcResponse {
        RpcResponse::failure(self.error, self.id).with_tag(self.tag)
    }
}

/// Parse a raw request body
pub fn parse(raw: &str) -> Result<RpcRequest, ParseFailure> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ParseFailure::new(RpcError::parse_error(e.to_string())))?;
    parse_value(value)
}

/// Validate an already-decoded JSON value as a request
pub fn parse_value(value: Value) -> Result<RpcRequest, ParseFailure> {
    let Value::Object(mut object) = value else {
        return Err(ParseFailure::new(RpcError::invalid_request(
            "Request must be a JSON object",
        )));
    };

    let id = match object.remove("id") {
        None => None,
        Some(raw) => match RequestId::from_value(&raw) {
            Some(id) => Some(id),
            None => {
                return Err(ParseFailure::new(RpcError::invalid_request(
                    "Request id must be a string, a number, or null",
                )));
            }
        },
    };

    let (tag, version) = read_tag(&mut object);
    let fail = |error: RpcError| ParseFailure {
        error,
        id: id.clone(),
        tag,
    };

    match version {
        Some(Value::String(v)) if v == JSONRPC_VERSION => {}
        Some(_) => {
            return Err(fail(RpcError::invalid_request(format!(
                "Protocol tag must be \"{JSONRPC_VERSION}\""
            ))));
        }
        None => {
            return Err(fail(RpcError::invalid_request(format!(
                "Missing protocol tag \"{JSONRPC_TAG_KEY}\""
            ))));
        }
    }

    let method = match object.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        Some(Value::String(_)) => {
            return Err(fail(RpcError::invalid_request("Method must not be empty")));
        }
        Some(_) => {
            return Err(fail(RpcError::invalid_request("Method must be a string")));
        }
        None => return Err(fail(RpcError::invalid_request("Missing method"))),
    };

    let params = match object.remove("params") {
        None => None,
        Some(Value::Object(params)) => Some(params),
        Some(_) => {
            return Err(fail(RpcError::invalid_request(
                "Params must be an object when present",
            )));
        }
    };

    Ok(RpcRequest {
        tag,
        method,
        params,
        id,
    })
}

fn read_tag(object: &mut Map<String, Value>) -> (TagKey, Option<Value>) {
    if let Some(version) = object.remove(JSONRPC_TAG_KEY) {
        return (TagKey::Jsonrpc, Some(version));
    }
    match object.remove(PROTOCOL_TAG_ALIAS_KEY) {
        Some(version) => (TagKey::ProtocolTag, Some(version)),
        None => (TagKey::Jsonrpc, None),
    }
}
