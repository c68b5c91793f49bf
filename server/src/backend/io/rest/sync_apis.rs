//! # REST API for Sync Events
//!
//! `GET /sync/events` streams `sync` events for the caller's family. A
//! client that falls behind receives `all` and should re-fetch everything.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::{future, Stream, StreamExt};
use shared::{SyncEvent, SyncTopic};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, info};

use crate::backend::domain::models::session::Session;
use crate::backend::domain::SyncSignal;
use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/events", get(sync_events))
}

/// Topic to forward to a subscriber of `family_id`, if any
pub(crate) fn topic_for(
    family_id: &str,
    item: Result<SyncSignal, BroadcastStreamRecvError>,
) -> Option<SyncTopic> {
    match item {
        Ok(signal) if signal.family_id == family_id => Some(signal.topic),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            debug!("Subscriber for family {} lagged by {} signals", family_id, missed);
            Some(SyncTopic::All)
        }
    }
}

pub async fn sync_events(
    State(state): State<AppState>,
    session: Session,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let family_id = state.child_service.family_of(&session).await?;
    info!("GET /api/sync/events - family {}", family_id);

    let stream = BroadcastStream::new(state.sync_hub.subscribe())
        .filter_map(move |item| future::ready(topic_for(&family_id, item)))
        .map(|topic| Event::default().event("sync").json_data(SyncEvent { topic }));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
