// handlers/protected/feed.rs - live-refresh event stream
//
// Clients hold one SSE connection and refetch whichever collection an
// event names. Lagged subscribers skip ahead; the next event triggers a
// full refetch anyway, so nothing is lost but an extra round-trip.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast;

use crate::config;
use crate::feed::ChangeEvent;
use crate::AppState;

/// GET /api/feed - subscribe to change notifications
pub async fn subscribe(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.feed.subscribe();
    let keepalive = Duration::from_secs(config::config().feed.sse_keepalive_secs);

    Sse::new(event_stream(rx)).keep_alive(KeepAlive::new().interval(keepalive))
}

fn event_stream(
    rx: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => match Event::default().event("change").json_data(change) {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(e) => {
                        tracing::error!("failed to encode change event: {}", e);
                        continue;
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("feed subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}
