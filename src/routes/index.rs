use crate::{
    maud_conveniences::{centered_note, title},
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RosterState>) -> Markup {
    let refresh_trigger = format!("load, sse:{}", SseEvent::CrudStudent.name());

    state.render(html! {
        div class="container mx-auto p-4" sse-connect="/sse_feed" {
            div id="students" hx-get="/internal/students" hx-trigger=(refresh_trigger) {
                (title("Students List"))
                (centered_note("Loading..."))
            }
        }
    })
}
