//! Tool Router Module
//!
//! Resolves a method, validates its params against the registry schema and
//! runs the handler. Every failure comes back as an [`RpcError`]: host errors
//! are mapped by [`adapters::host_error`], and a panicking handler becomes
//! `InternalError` with the panic message in `data.detail`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use mgw_domain::constants::LATEST_PROTOCOL_VERSION;
use mgw_domain::entities::EntityKind;
use mgw_domain::ports::HostServices;
use mgw_domain::rpc::{ErrorCode, FieldViolation, RpcError, validate_params};
use serde_json::{Map, Value, json};
use tracing::{debug, error};

use super::adapters;
use super::methods::{DomainMethod, MetaMethod, Method};
use super::registry::ToolRegistry;
use crate::constants::{RESOURCE_MIME_TYPE, RESOURCE_SCHEME, SERVER_NAME, SERVER_VERSION};

type Params = Map<String, Value>;

/// Host collections exposed through `resources/*`
const RESOURCES: [(&str, DomainMethod, &str); 6] = [
    ("tasks", DomainMethod::ListTasks, "All tasks"),
    ("projects", DomainMethod::ListProjects, "Active projects"),
    ("habits", DomainMethod::ListHabits, "All habits"),
    ("notes", DomainMethod::ListNotes, "All notes"),
    ("questions", DomainMethod::ListQuestions, "All questions"),
    ("activity", DomainMethod::ListActivity, "Recent activity"),
];

fn collection_of(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Task => "tasks",
        EntityKind::Project => "projects",
        EntityKind::Habit => "habits",
        EntityKind::Note => "notes",
        EntityKind::Question => "questions",
    }
}

/// Dispatches validated calls to meta handlers or the host
#[derive(Clone)]
pub struct ToolRouter {
    registry: Arc<ToolRegistry>,
    host: HostServices,
    supported_versions: Vec<String>,
}

impl ToolRouter {
    pub fn new(
        registry: Arc<ToolRegistry>,
        host: HostServices,
        supported_versions: Vec<String>,
    ) -> Self {
        Self {
            registry,
            host,
            supported_versions,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Resolve `method` and check `params` against its schema
    pub fn validate(&self, method: &str, params: Option<&Params>) -> Result<Method, RpcError> {
        let resolved = self
            .registry
            .resolve(method)
            .ok_or_else(|| RpcError::method_not_found(method))?;
        if let Some(schema) = self.registry.schema_for(method) {
            let report = validate_params(params, schema);
            if !report.valid {
                return Err(RpcError::invalid_params(&report.errors));
            }
        }
        Ok(resolved)
    }

    /// Validate and run one call
    pub async fn dispatch(&self, method: &str, params: Option<Params>) -> Result<Value, RpcError> {
        let resolved = self.validate(method, params.as_ref())?;
        let params = params.unwrap_or_default();

        match AssertUnwindSafe(self.run(resolved, params)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                error!(method, detail = %detail, "Handler panicked");
                Err(RpcError::internal(detail))
            }
        }
    }

    /// Resource URI changed by a successful call, if the call mutates
    pub fn changed_resource(&self, method: &str, params: Option<&Params>) -> Option<String> {
        let domain = match self.registry.resolve(method)? {
            Method::Domain(domain) => domain,
            Method::Meta(MetaMethod::ToolsCall) => {
                DomainMethod::from_name(params?.get("name")?.as_str()?)?
            }
            Method::Meta(_) => return None,
        };
        if !self.registry.mutates(domain) {
            return None;
        }
        let kind = domain.entity()?;
        Some(format!("{RESOURCE_SCHEME}{}", collection_of(kind)))
    }

    async fn run(&self, method: Method, params: Params) -> Result<Value, RpcError> {
        debug!(method = method.as_str(), "Dispatching");
        match method {
            Method::Domain(domain) => adapters::invoke(&self.host, domain, params).await,
            Method::Meta(MetaMethod::Initialize) => Ok(self.initialize(&params)),
            Method::Meta(MetaMethod::Ping | MetaMethod::InitializedNotification) => Ok(json!({})),
            Method::Meta(MetaMethod::ToolsList) => Ok(self.registry.tool_listing()),
            Method::Meta(MetaMethod::ToolsCall) => self.call_tool(params).await,
            Method::Meta(MetaMethod::ResourcesList) => Ok(resource_listing()),
            Method::Meta(MetaMethod::ResourcesRead) => self.read_resource(&params).await,
        }
    }

    /// Client's requested version when supported, otherwise the newest
    pub fn negotiate_version(&self, requested: Option<&str>) -> String {
        if let Some(requested) = requested {
            if self.supported_versions.iter().any(|v| v == requested) {
                return requested.to_string();
            }
        }
        if self
            .supported_versions
            .iter()
            .any(|v| v == LATEST_PROTOCOL_VERSION)
        {
            return LATEST_PROTOCOL_VERSION.to_string();
        }
        self.supported_versions
            .iter()
            .max()
            .cloned()
            .unwrap_or_else(|| LATEST_PROTOCOL_VERSION.to_string())
    }

    fn initialize(&self, params: &Params) -> Value {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        json!({
            "protocolVersion": self.negotiate_version(requested),
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
            },
            "instructions": "Manage tasks, projects, habits, notes and questions of the host application. \
                             Call tools/list for the available operations.",
        })
    }

    async fn call_tool(&self, mut params: Params) -> Result<Value, RpcError> {
        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => return Err(invalid("name", "is required")),
        };
        let method = DomainMethod::from_name(&name)
            .ok_or_else(|| invalid("name", format!("unknown tool '{name}'")))?;
        let arguments = match params.remove("arguments") {
            Some(Value::Object(arguments)) => arguments,
            Some(_) => return Err(invalid("arguments", "must be of type object")),
            None => Map::new(),
        };

        if let Some(entry) = self.registry.tool(method) {
            let report = validate_params(Some(&arguments), &entry.schema);
            if !report.valid {
                return Err(RpcError::invalid_params(&report.errors));
            }
        }

        let data = adapters::invoke(&self.host, method, arguments).await?;
        let text = serde_json::to_string_pretty(&data)
            .map_err(|e| RpcError::internal(e.to_string()))?;
        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": data,
            "isError": false,
        }))
    }

    async fn read_resource(&self, params: &Params) -> Result<Value, RpcError> {
        let uri = params.get("uri").and_then(Value::as_str).unwrap_or_default();
        let (_, method, _) = RESOURCES
            .iter()
            .find(|(name, _, _)| uri.strip_prefix(RESOURCE_SCHEME) == Some(*name))
            .ok_or_else(|| {
                RpcError::new(
                    ErrorCode::ResourceNotFound,
                    format!("Unknown resource: {uri}"),
                )
                .with_data(json!({ "uri": uri }))
            })?;

        let data = adapters::invoke(&self.host, *method, Map::new()).await?;
        let text = serde_json::to_string(&data).map_err(|e| RpcError::internal(e.to_string()))?;
        Ok(json!({
            "contents": [{ "uri": uri, "mimeType": RESOURCE_MIME_TYPE, "text": text }],
        }))
    }
}

fn resource_listing() -> Value {
    let resources: Vec<Value> = RESOURCES
        .iter()
        .map(|(name, _, description)| {
            json!({
                "uri": format!("{RESOURCE_SCHEME}{name}"),
                "name": name,
                "description": description,
                "mimeType": RESOURCE_MIME_TYPE,
            })
        })
        .collect();
    json!({ "resources": resources })
}

fn invalid(field: &str, message: impl Into<String>) -> RpcError {
    RpcError::invalid_params(&[FieldViolation {
        field: field.to_string(),
        message: message.into(),
    }])
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
