//! Session table
//!
//! Sessions live in a `DashMap` owned by [`SessionManager`]. Each one carries
//! two spawned tasks: a heartbeat that pushes a `ping` frame on a fixed
//! interval, and a close listener that tears the session down when the
//! client disconnects. Both are aborted when the session closes.
//!
//! Every entry records the generation it was opened with. Tasks act only on
//! the generation they were spawned for, so a session reopened under the
//! same id is never torn down by its predecessor's listener.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mgw_domain::ports::SharedClock;
use mgw_infrastructure::config::SessionConfig;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::transport::{EventKind, Frame, SessionTransport};

/// Snapshot of a session's public state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub connected_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    /// Id of the most recent frame sent
    pub last_event_seq: u64,
    /// Free-form connection details (remote address, last-event-id, ...)
    pub metadata: HashMap<String, String>,
}

struct SessionEntry {
    session: Session,
    last_activity: Instant,
    generation: u64,
    transport: Arc<dyn SessionTransport>,
    heartbeat: JoinHandle<()>,
    close_listener: JoinHandle<()>,
}

impl SessionEntry {
    fn teardown(self) {
        self.heartbeat.abort();
        self.close_listener.abort();
        self.transport.shutdown();
    }
}

/// Owner of every open streaming session
pub struct SessionManager {
    sessions: DashMap<String, SessionEntry>,
    clock: SharedClock,
    heartbeat_interval: Duration,
    idle_timeout: Duration,
    generation: AtomicU64,
}

impl SessionManager {
    pub fn new(clock: SharedClock, heartbeat_interval: Duration, idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
            heartbeat_interval,
            idle_timeout,
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &SessionConfig, clock: SharedClock) -> Self {
        Self::new(clock, config.heartbeat_interval(), config.idle_timeout())
    }

    /// Register a session and start its heartbeat and close listener
    ///
    /// An existing session with the same id is closed first; the new one
    /// starts again from sequence 0.
    pub fn open(
        self: &Arc<Self>,
        id: String,
        transport: Arc<dyn SessionTransport>,
        metadata: HashMap<String, String>,
    ) -> Session {
        if let Some((_, previous)) = self.sessions.remove(&id) {
            info!(session_id = %id, "Replacing session");
            previous.teardown();
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let now = self.clock.now_utc();
        let session = Session {
            id: id.clone(),
            connected_at: now,
            last_activity_at: now,
            last_event_seq: 0,
            metadata,
        };

        let entry = SessionEntry {
            session: session.clone(),
            last_activity: self.clock.now(),
            generation,
            transport: transport.clone(),
            heartbeat: self.spawn_heartbeat(id.clone(), generation),
            close_listener: self.spawn_close_listener(id.clone(), generation, transport.clone()),
        };
        self.sessions.insert(id.clone(), entry);
        info!(session_id = %id, sessions = self.sessions.len(), "Session opened");

        // The client may already be gone before the listener was polled.
        if transport.is_closed() {
            self.close_generation(&id, generation);
        }
        session
    }

    /// Push one frame; allocates the next sequence number when `seq` is `None`
    ///
    /// Returns false for unknown sessions. A failed write closes the session.
    pub fn send(
        &self,
        id: &str,
        kind: EventKind,
        data: impl Into<String>,
        seq: Option<u64>,
    ) -> bool {
        let (transport, frame, generation) = {
            let Some(mut entry) = self.sessions.get_mut(id) else {
                return false;
            };
            let seq = seq.unwrap_or(entry.session.last_event_seq + 1);
            entry.session.last_event_seq = seq;
            let frame = Frame {
                seq,
                kind,
                data: data.into(),
            };
            (entry.transport.clone(), frame, entry.generation)
        };

        if transport.write(frame) {
            if let Some(mut entry) = self.sessions.get_mut(id) {
                if entry.generation == generation {
                    entry.last_activity = self.clock.now();
                    entry.session.last_activity_at = self.clock.now_utc();
                }
            }
            true
        } else {
            debug!(session_id = %id, event = %kind, "Write failed, closing session");
            self.close_generation(id, generation);
            false
        }
    }

    /// Push a frame to every session; returns how many accepted it
    pub fn broadcast(&self, kind: EventKind, data: &str) -> usize {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.iter()
            .filter(|id| self.send(id, kind, data, None))
            .count()
    }

    /// Record inbound activity
    pub fn touch(&self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.last_activity = self.clock.now();
                entry.session.last_activity_at = self.clock.now_utc();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions.get(id).map(|entry| entry.session.clone())
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Close a session; false if it was not open
    pub fn close(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, entry)) => {
                entry.teardown();
                info!(session_id = %id, "Session closed");
                true
            }
            None => false,
        }
    }

    /// Close every session idle for longer than the idle timeout
    pub fn sweep_idle(&self) -> usize {
        let now = self.clock.now();
        let idle: Vec<(String, u64)> = self
            .sessions
            .iter()
            .filter(|entry| now.saturating_duration_since(entry.last_activity) > self.idle_timeout)
            .map(|entry| (entry.key().clone(), entry.generation))
            .collect();

        let closed = idle
            .iter()
            .filter(|(id, generation)| self.close_generation(id, *generation))
            .count();
        if closed > 0 {
            info!(closed, remaining = self.sessions.len(), "Swept idle sessions");
        }
        closed
    }

    /// Close every session
    pub fn close_all(&self) -> usize {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        let closed = ids.iter().filter(|id| self.close(id)).count();
        info!(closed, "Closed all sessions");
        closed
    }

    fn is_current(&self, id: &str, generation: u64) -> bool {
        self.sessions
            .get(id)
            .is_some_and(|entry| entry.generation == generation)
    }

    fn close_generation(&self, id: &str, generation: u64) -> bool {
        match self
            .sessions
            .remove_if(id, |_, entry| entry.generation == generation)
        {
            Some((_, entry)) => {
                entry.teardown();
                info!(session_id = %id, "Session closed");
                true
            }
            None => false,
        }
    }

    fn spawn_heartbeat(self: &Arc<Self>, id: String, generation: u64) -> JoinHandle<()> {
        let manager: Weak<Self> = Arc::downgrade(self);
        let period = self.heartbeat_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                if !manager.is_current(&id, generation) {
                    break;
                }
                let payload = json!({ "ts": manager.clock.now_utc().to_rfc3339() }).to_string();
                if !manager.send(&id, EventKind::Ping, payload, None) {
                    break;
                }
            }
        })
    }

    fn spawn_close_listener(
        self: &Arc<Self>,
        id: String,
        generation: u64,
        transport: Arc<dyn SessionTransport>,
    ) -> JoinHandle<()> {
        let manager: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            transport.closed().await;
            if let Some(manager) = manager.upgrade() {
                if manager.close_generation(&id, generation) {
                    debug!(session_id = %id, "Client disconnected");
                }
            }
        })
    }
}

/// Run [`SessionManager::sweep_idle`] every `period` until `token` is cancelled
pub fn spawn_idle_sweeper(
    manager: Arc<SessionManager>,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    manager.sweep_idle();
                }
            }
        }
        debug!("Idle session sweeper stopped");
    })
}
