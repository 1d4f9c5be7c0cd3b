//! Request guards

use std::convert::Infallible;
use std::net::IpAddr;

use rocket::request::{FromRequest, Outcome, Request};

use super::state::GatewayState;
use crate::constants::{LAST_EVENT_ID_HEADER, PROTOCOL_VERSION_HEADER, SESSION_ID_HEADER};
use crate::security::GateInput;

/// Headers and peer details every gateway route looks at
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub client_ip: Option<IpAddr>,
    pub protocol_version: Option<String>,
    pub origin: Option<String>,
    pub session_id: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    /// Value of the configured API key header
    pub api_key: Option<String>,
    pub last_event_id: Option<String>,
    pub host: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Rate limit bucket key
    pub fn rate_key(&self) -> String {
        self.client_ip
            .map_or_else(|| "unknown".to_string(), |ip| ip.to_string())
    }

    pub fn gate_input(&self, is_post: bool, opens_session: bool) -> GateInput<'_> {
        GateInput {
            is_post,
            opens_session,
            protocol_version: self.protocol_version.as_deref(),
            origin: self.origin.as_deref(),
            session_id: self.session_id.as_deref(),
            content_type: self.content_type.as_deref(),
        }
    }

    /// Whether `Accept` admits an event stream
    ///
    /// A missing header does not.
    pub fn accepts_event_stream(&self) -> bool {
        let Some(accept) = self.accept.as_deref() else {
            return false;
        };
        accept.split(',').any(|range| {
            let media = range.split(';').next().unwrap_or_default().trim();
            media.eq_ignore_ascii_case("text/event-stream")
                || media.eq_ignore_ascii_case("text/*")
                || media == "*/*"
        })
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestMeta {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();
        let header = |name: &str| headers.get_one(name).map(str::to_string);
        let api_key = request
            .rocket()
            .state::<GatewayState>()
            .and_then(|state| header(state.auth.header_name.as_str()));

        Outcome::Success(Self {
            client_ip: request.client_ip(),
            protocol_version: header(PROTOCOL_VERSION_HEADER),
            origin: header("Origin"),
            session_id: header(SESSION_ID_HEADER),
            content_type: header("Content-Type"),
            accept: header("Accept"),
            api_key,
            last_event_id: header(LAST_EVENT_ID_HEADER),
            host: header("Host"),
            user_agent: header("User-Agent"),
        })
    }
}
