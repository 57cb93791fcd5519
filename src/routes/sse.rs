use crate::state::RosterState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SseEvent {
    CrudStudent,
}

impl SseEvent {
    /// Name htmx listens for, as in `hx-trigger="sse:crud_student"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CrudStudent => "crud_student",
        }
    }
}

pub async fn sse_feed(
    State(state): State<RosterState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_to_sse_feed();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(Event::default().event(event.name()).data(event.name()))),
        Err(e) => {
            warn!(?e, "SSE subscriber lagged behind");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
