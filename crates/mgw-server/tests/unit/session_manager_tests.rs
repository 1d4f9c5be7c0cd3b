//! Tests for the session table

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mgw_domain::ports::{ManualClock, SharedClock};
use mgw_server::session::{
    ChannelTransport, EventKind, FrameReceiver, SessionManager, generate_id, spawn_idle_sweeper,
};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const IDLE: Duration = Duration::from_secs(3600);
const WAIT: Duration = Duration::from_secs(2);

fn manager(heartbeat: Duration) -> (Arc<SessionManager>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let shared: SharedClock = clock.clone();
    (Arc::new(SessionManager::new(shared, heartbeat, IDLE)), clock)
}

fn open(manager: &Arc<SessionManager>, id: &str) -> FrameReceiver {
    let (transport, receiver) = ChannelTransport::pair();
    manager.open(id.to_string(), transport, HashMap::new());
    receiver
}

#[tokio::test]
async fn test_open_registers_session() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    let _rx = open(&manager, &id);

    assert!(manager.contains(&id));
    assert_eq!(manager.count(), 1);
    let session = manager.get(&id).expect("session snapshot");
    assert_eq!(session.id, id);
    assert_eq!(session.last_event_seq, 0);
}

#[tokio::test]
async fn test_send_allocates_sequence_numbers() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    let mut rx = open(&manager, &id);

    assert!(manager.send(&id, EventKind::Message, "first", None));
    assert!(manager.send(&id, EventKind::Message, "second", None));
    assert!(manager.send(&id, EventKind::Error, "explicit", Some(10)));

    let first = rx.next_frame().await.expect("first frame");
    let second = rx.next_frame().await.expect("second frame");
    let third = rx.next_frame().await.expect("third frame");
    assert_eq!((first.seq, first.data.as_str()), (1, "first"));
    assert_eq!(second.seq, 2);
    assert_eq!((third.seq, third.kind), (10, EventKind::Error));
    assert_eq!(manager.get(&id).map(|s| s.last_event_seq), Some(10));
}

#[tokio::test]
async fn test_send_to_unknown_session_fails() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    assert!(!manager.send("missing", EventKind::Message, "{}", None));
}

#[tokio::test]
async fn test_close_is_idempotent_and_ends_stream() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    let mut rx = open(&manager, &id);

    assert!(manager.close(&id));
    assert!(!manager.close(&id));
    assert!(!manager.contains(&id));
    assert!(timeout(WAIT, rx.next_frame()).await.expect("stream ends").is_none());
}

#[tokio::test]
async fn test_disconnected_client_is_removed() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    let rx = open(&manager, &id);
    drop(rx);

    assert!(!manager.send(&id, EventKind::Message, "{}", None));
    assert!(!manager.contains(&id));
}

#[tokio::test]
async fn test_close_listener_tears_down_on_disconnect() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    drop(open(&manager, &id));

    timeout(WAIT, async {
        while manager.contains(&id) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("listener removes the session");
}

#[tokio::test]
async fn test_broadcast_reaches_only_open_sessions() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let (a, b, c) = (generate_id(), generate_id(), generate_id());
    let mut rx_a = open(&manager, &a);
    let mut rx_b = open(&manager, &b);
    let _rx_c = open(&manager, &c);
    manager.close(&c);

    assert_eq!(manager.broadcast(EventKind::Message, "update"), 2);
    assert_eq!(rx_a.next_frame().await.map(|f| f.data), Some("update".to_string()));
    assert_eq!(rx_b.next_frame().await.map(|f| f.data), Some("update".to_string()));
}

#[tokio::test]
async fn test_closing_one_session_leaves_others() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let (a, b) = (generate_id(), generate_id());
    let _rx_a = open(&manager, &a);
    let mut rx_b = open(&manager, &b);

    manager.close(&a);
    assert!(manager.contains(&b));
    assert!(manager.send(&b, EventKind::Message, "still here", None));
    assert_eq!(rx_b.next_frame().await.map(|f| f.seq), Some(1));
}

#[tokio::test]
async fn test_sweep_closes_only_idle_sessions() {
    let (manager, clock) = manager(Duration::from_secs(30));
    let (idle, active) = (generate_id(), generate_id());
    let _rx_idle = open(&manager, &idle);
    let _rx_active = open(&manager, &active);

    clock.advance(Duration::from_secs(30 * 60));
    assert!(manager.touch(&active));
    clock.advance(Duration::from_secs(31 * 60));

    assert_eq!(manager.sweep_idle(), 1);
    assert!(!manager.contains(&idle));
    assert!(manager.contains(&active));
}

#[tokio::test]
async fn test_heartbeat_pings_keep_session_alive() {
    let (manager, clock) = manager(Duration::from_millis(20));
    let id = generate_id();
    let mut rx = open(&manager, &id);

    let frame = timeout(WAIT, rx.next_frame())
        .await
        .expect("heartbeat arrives")
        .expect("stream open");
    assert_eq!(frame.kind, EventKind::Ping);
    assert!(frame.data.contains("ts"));

    clock.advance(IDLE + Duration::from_secs(1));
    // Several pings are written after the jump.
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(manager.sweep_idle(), 0);
    let session = manager.get(&id).expect("session still open");
    assert!(session.last_activity_at > session.connected_at);
}

#[tokio::test]
async fn test_session_without_heartbeats_is_swept() {
    let (manager, clock) = manager(Duration::from_secs(7200));
    let id = generate_id();
    let _rx = open(&manager, &id);

    clock.advance(IDLE + Duration::from_secs(1));
    assert_eq!(manager.sweep_idle(), 1);
    assert!(!manager.contains(&id));
}

#[tokio::test]
async fn test_reopen_replaces_session_under_same_id() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    let mut old_rx = open(&manager, &id);
    manager.send(&id, EventKind::Message, "old", None);

    let mut new_rx = open(&manager, &id);
    assert_eq!(manager.count(), 1);
    assert_eq!(manager.get(&id).map(|s| s.last_event_seq), Some(0));

    // The old stream drains then ends.
    assert_eq!(old_rx.next_frame().await.map(|f| f.data), Some("old".to_string()));
    assert!(timeout(WAIT, old_rx.next_frame()).await.expect("old stream ends").is_none());
    drop(old_rx);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(manager.contains(&id));
    assert!(manager.send(&id, EventKind::Message, "new", None));
    assert_eq!(new_rx.next_frame().await.map(|f| f.seq), Some(1));
}

#[tokio::test]
async fn test_close_all() {
    let (manager, _clock) = manager(Duration::from_secs(30));
    let _a = open(&manager, &generate_id());
    let _b = open(&manager, &generate_id());
    assert_eq!(manager.close_all(), 2);
    assert_eq!(manager.count(), 0);
}

#[tokio::test]
async fn test_sweeper_stops_on_cancel() {
    let (manager, clock) = manager(Duration::from_secs(30));
    let id = generate_id();
    let _rx = open(&manager, &id);
    clock.advance(IDLE + Duration::from_secs(1));

    let token = CancellationToken::new();
    let handle = spawn_idle_sweeper(manager.clone(), Duration::from_millis(10), token.clone());
    timeout(WAIT, async {
        while manager.contains(&id) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("sweeper closes the idle session");

    token.cancel();
    timeout(WAIT, handle)
        .await
        .expect("sweeper stops")
        .expect("sweeper task does not panic");
}
