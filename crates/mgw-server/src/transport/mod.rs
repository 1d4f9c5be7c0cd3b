//! HTTP Transport
//!
//! Rocket routes for the session-oriented `/mcp` endpoint, the legacy
//! `/sse` + `/messages` pair and `/health`.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`state`] | Shared [`GatewayState`] |
//! | [`guards`] | [`RequestMeta`] request guard |
//! | [`pipeline`] | Rate limit, gate, auth and JSON-RPC handling |
//! | [`response`] | JSON and event-stream responders |
//! | [`sse`] | Session frames as SSE events |
//! | [`routes`] | Route handlers |
//! | [`catchers`] | JSON error catchers |

pub mod catchers;
pub mod guards;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod sse;
pub mod state;

use rocket::fairing::AdHoc;
use rocket::{Build, Rocket, catchers, routes};
use tracing::info;

use crate::session::spawn_idle_sweeper;

pub use guards::RequestMeta;
pub use pipeline::{Admission, RpcOutcome, admit, handle_rpc, status_for};
pub use response::{GatewayResponse, SseResponse};
pub use state::GatewayState;

/// Build the gateway Rocket instance
///
/// The idle sweeper starts on liftoff. On shutdown it is cancelled and every
/// open session is closed so streams end before the grace period.
pub fn gateway_rocket(state: GatewayState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/",
            routes![
                routes::mcp_post,
                routes::mcp_stream,
                routes::mcp_delete,
                routes::legacy_stream,
                routes::legacy_messages,
                routes::health,
            ],
        )
        .register(
            "/",
            catchers![
                catchers::bad_request,
                catchers::not_found,
                catchers::payload_too_large,
                catchers::unprocessable,
                catchers::internal_error,
            ],
        )
        .attach(AdHoc::on_liftoff("Idle session sweeper", |rocket| {
            Box::pin(async move {
                if let Some(state) = rocket.state::<GatewayState>() {
                    spawn_idle_sweeper(
                        state.sessions.clone(),
                        state.config.session.sweep_interval(),
                        state.shutdown.clone(),
                    );
                }
            })
        }))
        .attach(AdHoc::on_shutdown("Close sessions", |rocket| {
            Box::pin(async move {
                if let Some(state) = rocket.state::<GatewayState>() {
                    state.shutdown.cancel();
                    let closed = state.sessions.close_all();
                    info!(closed, "Gateway shutting down");
                }
            })
        }))
}
