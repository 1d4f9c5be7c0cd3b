//! Request, response and error envelopes

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::codes::ErrorCode;
use super::schema::FieldViolation;
use crate::constants::{JSONRPC_TAG_KEY, JSONRPC_VERSION, PROTOCOL_TAG_ALIAS_KEY};

/// Key under which a message carries its protocol tag
///
/// Requests may use either key; the response mirrors the one the request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagKey {
    /// Standard `jsonrpc` key
    #[default]
    Jsonrpc,
    /// `protocolTag` alias
    ProtocolTag,
}

impl TagKey {
    /// Wire name of the key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jsonrpc => JSONRPC_TAG_KEY,
            Self::ProtocolTag => PROTOCOL_TAG_ALIAS_KEY,
        }
    }
}

/// Request identifier
///
/// A string stays a string and a number stays a number when echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id (integer or float, preserved exactly)
    Number(serde_json::Number),
    /// String id
    String(String),
    /// Explicit `null` id; a response is still owed
    Null,
}

impl RequestId {
    /// Convert a JSON value into an id, rejecting arrays, objects and booleans
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null => Some(Self::Null),
            _ => None,
        }
    }

    /// JSON representation of the id
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Null => Value::Null,
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A validated JSON-RPC request or notification
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// Key the protocol tag arrived under
    pub tag: TagKey,
    /// Method name, never empty
    pub method: String,
    /// Named parameters, if any were supplied
    pub params: Option<Map<String, Value>>,
    /// Request id; `None` marks a notification
    pub id: Option<RequestId>,
}

impl RpcRequest {
    /// Build a request with the standard tag
    pub fn new(
        method: impl Into<String>,
        params: Option<Map<String, Value>>,
        id: Option<RequestId>,
    ) -> Self {
        Self {
            tag: TagKey::Jsonrpc,
            method: method.into(),
            params,
            id,
        }
    }

    /// True iff the request carries no `id` at all
    ///
    /// An explicit `null` id is not a notification.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional diagnostic payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error of the given kind with a custom message
    pub fn new(kind: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: kind.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Attach diagnostic data
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Kind of the error, if the code belongs to the taxonomy
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }

    /// Malformed JSON body
    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, ErrorCode::ParseError.default_message())
            .with_data(serde_json::json!({ "detail": detail.into() }))
    }

    /// Structurally wrong request
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Unknown method name
    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("Method not found: {method}"))
            .with_data(serde_json::json!({ "method": method }))
    }

    /// Schema validation failure carrying every violation
    pub fn invalid_params(errors: &[FieldViolation]) -> Self {
        Self::new(ErrorCode::InvalidParams, ErrorCode::InvalidParams.default_message())
            .with_data(serde_json::json!({ "errors": errors }))
    }

    /// Uncaught handler failure; the original message is kept as `data.detail`
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, ErrorCode::InternalError.default_message())
            .with_data(serde_json::json!({ "detail": detail.into() }))
    }
}

/// Outcome half of a response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// Successful result
    Result(Value),
    /// Failure
    Error(RpcError),
}

/// JSON-RPC response envelope
///
/// Exactly one of `result` / `error` is serialized. A missing id is written as
/// `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    /// Key the protocol tag is written under
    pub tag: TagKey,
    /// Result or error
    pub payload: ResponsePayload,
    /// Echoed request id
    pub id: Option<RequestId>,
}

impl RpcResponse {
    /// Create a success response
    pub fn success(result: Value, id: Option<RequestId>) -> Self {
        Self {
            tag: TagKey::Jsonrpc,
            payload: ResponsePayload::Result(result),
            id,
        }
    }

    /// Create an error response
    pub fn failure(error: RpcError, id: Option<RequestId>) -> Self {
        Self {
            tag: TagKey::Jsonrpc,
            payload: ResponsePayload::Error(error),
            id,
        }
    }

    /// Write the protocol tag under the given key
    #[must_use]
    pub fn with_tag(mut self, tag: TagKey) -> Self {
        self.tag = tag;
        self
    }

    /// The error, if this is a failure response
    pub fn error(&self) -> Option<&RpcError> {
        match &self.payload {
            ResponsePayload::Error(err) => Some(err),
            ResponsePayload::Result(_) => None,
        }
    }

    /// The result, if this is a success response
    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for RpcResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(self.tag.as_str(), JSONRPC_VERSION)?;
        match &self.payload {
            ResponsePayload::Result(value) => map.serialize_entry("result", value)?,
            ResponsePayload::Error(err) => map.serialize_entry("error", err)?,
        }
        map.serialize_entry("id", &self.id.as_ref().map_or(Value::Null, RequestId::to_value))?;
        map.end()
    }
}
