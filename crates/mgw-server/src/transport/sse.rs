//! Session frames as Server-Sent Events

use futures::Stream;
use rocket::response::stream::{Event, EventStream};
use tracing::debug;

use crate::session::FrameReceiver;

/// Stream a session's frames until it closes
///
/// Rocket's own heartbeat is off; the session manager sends `ping` events.
pub fn frame_stream(
    mut receiver: FrameReceiver,
    session_id: String,
) -> EventStream<impl Stream<Item = Event>> {
    EventStream::from(async_stream::stream! {
        while let Some(frame) = receiver.next_frame().await {
            yield Event::data(frame.data)
                .event(frame.kind.as_str())
                .id(frame.seq.to_string());
        }
        debug!(session_id = %session_id, "Event stream ended");
    })
    .heartbeat(None)
}
