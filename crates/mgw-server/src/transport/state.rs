//! Shared gateway state
//!
//! One [`GatewayState`] is managed by Rocket and reached from every route
//! through `&State<GatewayState>`. Each component owns its own map; nothing
//! here is behind a lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mgw_domain::error::Result;
use mgw_domain::ports::{HostServices, SharedClock};
use mgw_infrastructure::config::AppConfig;
use tokio_util::sync::CancellationToken;

use crate::auth::ApiKeyAuth;
use crate::rate_limit::RateLimiter;
use crate::security::SecurityGate;
use crate::session::SessionManager;
use crate::tools::{ToolRegistry, ToolRouter};

pub struct GatewayState {
    pub config: Arc<AppConfig>,
    pub router: ToolRouter,
    pub sessions: Arc<SessionManager>,
    pub gate: SecurityGate,
    pub limiter: RateLimiter,
    pub auth: ApiKeyAuth,
    pub clock: SharedClock,
    pub started_at: Instant,
    /// Cancelled on shutdown; stops the idle sweeper
    pub shutdown: CancellationToken,
}

impl GatewayState {
    /// Build state around the built-in tool manifest
    pub fn new(config: AppConfig, host: HostServices, clock: SharedClock) -> Result<Self> {
        let registry = Arc::new(ToolRegistry::builtin()?);
        Ok(Self::with_registry(config, registry, host, clock))
    }

    pub fn with_registry(
        config: AppConfig,
        registry: Arc<ToolRegistry>,
        host: HostServices,
        clock: SharedClock,
    ) -> Self {
        let router = ToolRouter::new(
            registry,
            host,
            config.security.supported_versions.clone(),
        );
        let sessions = Arc::new(SessionManager::from_config(&config.session, clock.clone()));
        Self {
            router,
            sessions,
            gate: SecurityGate::from_config(&config.security),
            limiter: RateLimiter::from_config(&config.rate_limit, clock.clone()),
            auth: ApiKeyAuth::from_config(&config.auth),
            started_at: clock.now(),
            clock,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started_at)
    }
}
