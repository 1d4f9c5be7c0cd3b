//! Tool Registry Module
//!
//! Holds the tool manifest compiled into the binary. The manifest is parsed
//! and cross-checked against [`DomainMethod`] once at startup; afterwards the
//! registry is immutable and shared behind an `Arc`.

use std::collections::{BTreeMap, HashMap, HashSet};

use mgw_domain::error::{Error, Result};
use mgw_domain::rpc::{PropertySchema, PropertyType, ToolSchema};
use serde::Deserialize;
use serde_json::{Value, json};

use super::methods::{DomainMethod, MetaMethod, Method};

const BUILTIN_MANIFEST: &str = include_str!("../../manifest/tools.json");

/// One manifest entry: schema plus listing metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ToolEntry {
    /// Human description shown by `tools/list`
    pub description: String,
    /// Whether a successful call changes host data
    #[serde(default)]
    pub mutates: bool,
    /// Parameter schema
    #[serde(flatten)]
    pub schema: ToolSchema,
}

impl ToolEntry {
    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    tools: Vec<ToolEntry>,
}

/// Immutable table of every method the gateway answers
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<(DomainMethod, ToolEntry)>,
    meta: HashMap<MetaMethod, ToolSchema>,
}

impl ToolRegistry {
    /// Load the manifest compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_manifest(BUILTIN_MANIFEST)
    }

    /// Parse a manifest and check it covers exactly the known domain methods
    pub fn from_manifest(raw: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(raw).map_err(|e| {
            Error::configuration_with_source("Tool manifest is not valid", e)
        })?;

        let mut seen = HashSet::new();
        let mut tools = Vec::with_capacity(manifest.tools.len());
        for entry in manifest.tools {
            let method = DomainMethod::from_name(entry.name()).ok_or_else(|| {
                Error::configuration(format!("Manifest tool '{}' has no handler", entry.name()))
            })?;
            if !seen.insert(method) {
                return Err(Error::configuration(format!(
                    "Manifest lists tool '{}' twice",
                    entry.name()
                )));
            }
            tools.push((method, entry));
        }

        if let Some(missing) = DomainMethod::ALL.iter().find(|m| !seen.contains(m)) {
            return Err(Error::configuration(format!(
                "Manifest is missing tool '{}'",
                missing.as_str()
            )));
        }

        Ok(Self {
            tools,
            meta: meta_schemas(),
        })
    }

    /// Every method name: meta methods first, then manifest tools
    pub fn list_methods(&self) -> Vec<&'static str> {
        MetaMethod::ALL
            .iter()
            .map(|m| m.as_str())
            .chain(self.tools.iter().map(|(m, _)| m.as_str()))
            .collect()
    }

    /// Resolve a method name
    pub fn resolve(&self, name: &str) -> Option<Method> {
        Method::from_name(name)
    }

    /// Parameter schema of any method
    pub fn schema_for(&self, method: &str) -> Option<&ToolSchema> {
        match self.resolve(method)? {
            Method::Meta(meta) => self.meta.get(&meta),
            Method::Domain(domain) => self.tool(domain).map(|entry| &entry.schema),
        }
    }

    /// Manifest entry of a domain method
    pub fn tool(&self, method: DomainMethod) -> Option<&ToolEntry> {
        self.tools
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, entry)| entry)
    }

    /// Manifest entries in manifest order
    pub fn tools(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.iter().map(|(_, entry)| entry)
    }

    /// Whether a successful call of `method` changes host data
    pub fn mutates(&self, method: DomainMethod) -> bool {
        self.tool(method).is_some_and(|entry| entry.mutates)
    }

    /// `tools/list` result body
    pub fn tool_listing(&self) -> Value {
        let tools: Vec<Value> = self
            .tools()
            .map(|entry| {
                json!({
                    "name": entry.name(),
                    "description": entry.description,
                    "inputSchema": entry.schema.to_json_schema(),
                })
            })
            .collect();
        json!({ "tools": tools })
    }
}

fn schema(name: &str, required: &[&str], properties: &[(&str, PropertySchema)]) -> ToolSchema {
    let mut props: BTreeMap<String, PropertySchema> = properties
        .iter()
        .map(|(key, prop)| ((*key).to_string(), prop.clone()))
        .collect();
    // Every request may carry protocol-level metadata.
    props.insert("_meta".to_string(), PropertySchema::of(PropertyType::Object));
    ToolSchema {
        name: name.to_string(),
        required: required.iter().map(ToString::to_string).collect(),
        properties: props,
    }
}

fn meta_schemas() -> HashMap<MetaMethod, ToolSchema> {
    let string = || PropertySchema::of(PropertyType::String);
    let object = || PropertySchema::of(PropertyType::Object);
    let non_empty = || PropertySchema {
        min_length: Some(1),
        ..PropertySchema::of(PropertyType::String)
    };

    MetaMethod::ALL
        .into_iter()
        .map(|method| {
            let name = method.as_str();
            let schema = match method {
                MetaMethod::Initialize => schema(
                    name,
                    &[],
                    &[
                        ("protocolVersion", string()),
                        ("capabilities", object()),
                        ("clientInfo", object()),
                    ],
                ),
                MetaMethod::ToolsList | MetaMethod::ResourcesList => {
                    schema(name, &[], &[("cursor", string())])
                }
                MetaMethod::ToolsCall => schema(
                    name,
                    &["name"],
                    &[("name", non_empty()), ("arguments", object())],
                ),
                MetaMethod::ResourcesRead => schema(name, &["uri"], &[("uri", non_empty())]),
                MetaMethod::Ping | MetaMethod::InitializedNotification => schema(name, &[], &[]),
            };
            (method, schema)
        })
        .collect()
}
