//! Security Gate
//!
//! Transport checks that run before a request body is parsed. Each check
//! either passes or returns a [`Rejection`]; the first failure wins.
//!
//! | Order | Check | Rejection |
//! |-------|-------|-----------|
//! | 1 | `MCP-Protocol-Version` | `missing_protocol_version` / `unsupported_protocol_version` (400) |
//! | 2 | `Origin` whitelist | `forbidden_origin` (403) |
//! | 3 | `Mcp-Session-Id` format | `invalid_session_id` / `missing_session_id` (400) |
//! | 4 | POST `Content-Type` | `unsupported_media_type` (415) |

pub mod origin;

use mgw_infrastructure::config::{SecurityConfig, VersionMode};
use rocket::http::Status;
use tracing::warn;

use crate::constants::{PROTOCOL_VERSION_HEADER, SESSION_ID_HEADER};
use crate::rejection::Rejection;
use crate::session;

pub use origin::OriginPolicy;

/// How strictly a request is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateProfile {
    /// Version header required and must be supported
    Strict,
    /// Unsupported or absent versions tolerated
    Relaxed,
    /// Legacy SSE bridge: no version or origin checks
    Legacy,
}

impl From<VersionMode> for GateProfile {
    fn from(mode: VersionMode) -> Self {
        match mode {
            VersionMode::Strict => Self::Strict,
            VersionMode::Relaxed => Self::Relaxed,
        }
    }
}

/// Request attributes the gate looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct GateInput<'a> {
    /// POST requests also get the content-type check
    pub is_post: bool,
    /// The request may open a new session, so a missing id is fine
    pub opens_session: bool,
    pub protocol_version: Option<&'a str>,
    pub origin: Option<&'a str>,
    pub session_id: Option<&'a str>,
    pub content_type: Option<&'a str>,
}

/// What the gate established about an admitted request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatePass {
    /// Version to echo in `MCP-Protocol-Version`
    pub negotiated_version: Option<String>,
    /// Well-formed session id to echo in `Mcp-Session-Id`
    pub session_id: Option<String>,
}

/// Ordered transport checks
#[derive(Debug, Clone)]
pub struct SecurityGate {
    profile: GateProfile,
    supported_versions: Vec<String>,
    origins: OriginPolicy,
    require_session: bool,
}

impl SecurityGate {
    pub fn new(
        profile: GateProfile,
        supported_versions: Vec<String>,
        origins: OriginPolicy,
        require_session: bool,
    ) -> Self {
        Self {
            profile,
            supported_versions,
            origins,
            require_session,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.version_mode.into(),
            config.supported_versions.clone(),
            OriginPolicy::new(&config.allowed_origins),
            config.require_session,
        )
    }

    /// Profile applied to the `/mcp` endpoint
    pub fn profile(&self) -> GateProfile {
        self.profile
    }

    /// Whether `origin` is on the whitelist
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.origins.allows(origin)
    }

    /// Run every check under the configured profile
    pub fn check(&self, input: &GateInput<'_>) -> Result<GatePass, Rejection> {
        self.check_with(self.profile, input)
    }

    /// Run every check under an explicit profile
    pub fn check_with(
        &self,
        profile: GateProfile,
        input: &GateInput<'_>,
    ) -> Result<GatePass, Rejection> {
        let negotiated_version = self.check_version(profile, input.protocol_version)?;
        if profile != GateProfile::Legacy {
            self.check_origin(input.origin)?;
        }
        let session_id = self.check_session(profile, input)?;
        if input.is_post {
            check_content_type(input.content_type)?;
        }
        Ok(GatePass {
            negotiated_version,
            session_id,
        })
    }

    fn check_version(
        &self,
        profile: GateProfile,
        requested: Option<&str>,
    ) -> Result<Option<String>, Rejection> {
        let supported = |v: &str| self.supported_versions.iter().any(|s| s == v);
        match (profile, requested) {
            (GateProfile::Legacy, _) => Ok(None),
            (_, Some(version)) if supported(version) => Ok(Some(version.to_string())),
            (GateProfile::Strict, None) => Err(Rejection::bad_request(
                "missing_protocol_version",
                format!("The {PROTOCOL_VERSION_HEADER} header is required"),
            )),
            (GateProfile::Strict, Some(version)) => Err(Rejection::bad_request(
                "unsupported_protocol_version",
                format!("Protocol version '{version}' is not supported"),
            )
            .with_detail("supported", self.supported_versions.clone())),
            (GateProfile::Relaxed, Some(version)) => {
                warn!(version, "Tolerating unsupported protocol version");
                Ok(None)
            }
            (GateProfile::Relaxed, None) => Ok(None),
        }
    }

    fn check_origin(&self, origin: Option<&str>) -> Result<(), Rejection> {
        match origin {
            Some(origin) if !self.origins.allows(origin) => {
                warn!(origin, "Rejected request from forbidden origin");
                Err(Rejection::forbidden(
                    "forbidden_origin",
                    format!("Origin '{origin}' is not allowed"),
                ))
            }
            _ => Ok(()),
        }
    }

    fn check_session(
        &self,
        profile: GateProfile,
        input: &GateInput<'_>,
    ) -> Result<Option<String>, Rejection> {
        match input.session_id {
            Some(id) if session::is_valid_id(id) => Ok(Some(id.to_string())),
            Some(_) => Err(Rejection::bad_request(
                "invalid_session_id",
                format!("The {SESSION_ID_HEADER} header must be a UUID"),
            )),
            None if self.require_session
                && profile != GateProfile::Legacy
                && !input.opens_session =>
            {
                Err(Rejection::bad_request(
                    "missing_session_id",
                    format!("The {SESSION_ID_HEADER} header is required"),
                ))
            }
            None => Ok(None),
        }
    }
}

fn check_content_type(content_type: Option<&str>) -> Result<(), Rejection> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("application/json") => Ok(()),
        Some(other) => Err(unsupported_media_type(other)),
        None => Err(unsupported_media_type("none")),
    }
}

fn unsupported_media_type(received: &str) -> Rejection {
    Rejection::new(
        Status::UnsupportedMediaType,
        "unsupported_media_type",
        format!("Content-Type must be application/json, got {received}"),
    )
}
