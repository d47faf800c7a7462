use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/events/stream", get(event_stream))
}

/// GET /v1/events/stream
/// Live booking events as named server-sent events.
async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.bus.subscribe().await;
    debug!(subscriber_id = subscription.id, "Event stream opened");

    let stream = UnboundedReceiverStream::new(subscription.rx).map(|event| {
        let frame = Event::default().event(event.name());
        let frame = match serde_json::to_string(&event) {
            Ok(payload) => frame.data(payload),
            Err(_) => frame.data("{}"),
        };
        Ok::<_, Infallible>(frame)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
