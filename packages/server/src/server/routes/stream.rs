//! SSE streaming endpoint.
//!
//! GET /events/:topic
//!
//! Subscribes to the in-process event hub by topic and forwards events to
//! the client as named SSE events. Observers that connect after a publish do
//! not receive it; a receiver that falls behind gets a `lagged` marker.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::kernel::event_hub::{REGISTRATIONS_TOPIC, SPONSORS_TOPIC};
use crate::server::app::AppState;

/// SSE stream handler.
///
/// Only the known topics are subscribable; the hub creates a channel per
/// topic on subscribe, so an arbitrary client-supplied name must not reach
/// it.
pub async fn stream_handler(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    if topic != REGISTRATIONS_TOPIC && topic != SPONSORS_TOPIC {
        return Err(StatusCode::NOT_FOUND);
    }

    let rx = state.event_hub.subscribe(&topic).await;

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Some(Ok::<_, Infallible>(
                Event::default()
                    .event(event.event)
                    .data(event.data.to_string()),
            )),
            Err(BroadcastStreamRecvError::Lagged(_)) => {
                Some(Ok(Event::default().event("lagged").data("{}")))
            }
        }
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}
