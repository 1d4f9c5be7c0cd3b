//! Session streams over `GET /mcp` and `DELETE /mcp`

use rocket::http::{ContentType, Header, Status};
use serde_json::{Value, json};

use crate::test_utils::{TestGateway, read_json};

#[rocket::async_test]
async fn test_stream_opens_session() {
    let gateway = TestGateway::with_defaults().await;
    let response = gateway
        .client
        .get("/mcp")
        .header(Header::new("Accept", "text/event-stream"))
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.content_type(),
        Some(ContentType::new("text", "event-stream"))
    );
    assert_eq!(response.headers().get_one("Cache-Control"), Some("no-cache"));
    assert_eq!(response.headers().get_one("X-Accel-Buffering"), Some("no"));
    let id = response
        .headers()
        .get_one("Mcp-Session-Id")
        .expect("session id header");
    assert!(mgw_server::session::is_valid_id(id));
    assert!(gateway.state().sessions.contains(id));
}

#[rocket::async_test]
async fn test_stream_requires_event_stream_accept() {
    let gateway = TestGateway::with_defaults().await;
    for accept in [None, Some("application/json")] {
        let mut request = gateway.client.get("/mcp");
        if let Some(accept) = accept {
            request = request.header(Header::new("Accept", accept));
        }
        let (status, body) = read_json(request.dispatch().await).await;
        assert_eq!(status, Status::NotAcceptable);
        assert_eq!(body["error"], "not_acceptable");
    }
    assert_eq!(gateway.state().sessions.count(), 0);
}

#[rocket::async_test]
async fn test_sessions_are_unique() {
    let gateway = TestGateway::with_defaults().await;
    let (first, _a) = gateway.open_stream().await;
    let (second, _b) = gateway.open_stream().await;
    assert_ne!(first, second);
    assert_eq!(gateway.state().sessions.count(), 2);
}

#[rocket::async_test]
async fn test_unknown_session_id_gets_fresh_session() {
    let gateway = TestGateway::with_defaults().await;
    let stale = "0b6f6c4e-5f0a-4a8e-9f6f-2c7d8e9a0b1c";
    let response = gateway
        .client
        .get("/mcp")
        .header(Header::new("Accept", "text/event-stream"))
        .header(Header::new("Mcp-Session-Id", stale))
        .header(Header::new("Last-Event-ID", "17"))
        .dispatch()
        .await;

    let id = response
        .headers()
        .get_one("Mcp-Session-Id")
        .expect("session id header")
        .to_string();
    assert_ne!(id, stale);
    let session = gateway.state().sessions.get(&id).expect("session");
    assert_eq!(session.last_event_seq, 0);
    assert_eq!(session.metadata.get("last_event_id").map(String::as_str), Some("17"));
}

#[rocket::async_test]
async fn test_reopen_of_live_session_keeps_id() {
    let gateway = TestGateway::with_defaults().await;
    let (id, _old) = gateway.open_stream().await;

    let response = gateway
        .client
        .get("/mcp")
        .header(Header::new("Accept", "text/event-stream"))
        .header(Header::new("Mcp-Session-Id", id.clone()))
        .dispatch()
        .await;
    assert_eq!(response.headers().get_one("Mcp-Session-Id"), Some(id.as_str()));
    assert_eq!(gateway.state().sessions.count(), 1);
}

#[rocket::async_test]
async fn test_delete_session() {
    let gateway = TestGateway::with_defaults().await;
    let (id, _stream) = gateway.open_stream().await;

    let response = gateway
        .client
        .delete("/mcp")
        .header(Header::new("Mcp-Session-Id", id.clone()))
        .dispatch()
        .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({ "closed": id }));
    assert!(!gateway.state().sessions.contains(&id));

    let again = gateway
        .client
        .delete("/mcp")
        .header(Header::new("Mcp-Session-Id", id.clone()))
        .dispatch()
        .await;
    let (status, body) = read_json(again).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error"], "session_not_found");
}

#[rocket::async_test]
async fn test_delete_requires_valid_session_header() {
    let gateway = TestGateway::with_defaults().await;

    let (status, body) = read_json(gateway.client.delete("/mcp").dispatch().await).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"], "missing_session_id");

    let response = gateway
        .client
        .delete("/mcp")
        .header(Header::new("Mcp-Session-Id", "not-a-uuid"))
        .dispatch()
        .await;
    let (status, body) = read_json(response).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"], "invalid_session_id");
}

#[rocket::async_test]
async fn test_closing_one_session_leaves_the_other() {
    let gateway = TestGateway::with_defaults().await;
    let (first, _a) = gateway.open_stream().await;
    let (second, _b) = gateway.open_stream().await;

    gateway
        .client
        .delete("/mcp")
        .header(Header::new("Mcp-Session-Id", first.clone()))
        .dispatch()
        .await;
    assert!(!gateway.state().sessions.contains(&first));
    assert!(gateway.state().sessions.contains(&second));
}

#[rocket::async_test]
async fn test_post_echoes_and_touches_session() {
    let gateway = TestGateway::with_defaults().await;
    let (id, _stream) = gateway.open_stream().await;
    let response = gateway
        .client
        .post("/mcp")
        .header(ContentType::JSON)
        .header(Header::new("Mcp-Session-Id", id.clone()))
        .body(json!({ "jsonrpc": "2.0", "method": "ping", "id": 1 }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("Mcp-Session-Id"), Some(id.as_str()));
}

#[rocket::async_test]
async fn test_mutation_is_announced_on_open_streams() {
    let gateway = TestGateway::with_defaults().await;
    let (_id, mut events) = gateway.open_stream().await;

    let (status, _) = gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "create_task",
            "params": { "title": "Ship it" },
            "id": 1,
        }))
        .await;
    assert_eq!(status, Status::Ok);

    let event = events.next_event().await;
    assert_eq!(event.event.as_deref(), Some("message"));
    assert_eq!(event.id.as_deref(), Some("1"));
    let notification: Value = serde_json::from_str(&event.data).expect("JSON frame");
    assert_eq!(notification["method"], "notifications/resources/updated");
    assert_eq!(notification["params"]["uri"], "gateway://tasks");
}

#[rocket::async_test]
async fn test_reads_are_not_announced() {
    let gateway = TestGateway::with_defaults().await;
    let (_id, mut events) = gateway.open_stream().await;

    gateway
        .rpc(&json!({ "jsonrpc": "2.0", "method": "list_tasks", "id": 1 }))
        .await;
    gateway
        .rpc(&json!({
            "jsonrpc": "2.0",
            "method": "create_note",
            "params": { "title": "After the read" },
            "id": 2,
        }))
        .await;

    // The first frame is the note announcement, so the read pushed nothing.
    let event = events.next_event().await;
    let notification: Value = serde_json::from_str(&event.data).expect("JSON frame");
    assert_eq!(notification["params"]["uri"], "gateway://notes");
}
