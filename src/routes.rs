use crate::{
    routes::{
        api::{delete_student, get_students, mutate_export_path, patch_student, post_student},
        export::get_students_csv,
        index::get_index_route,
        sse::sse_feed,
        students::{
            internal_get_students, internal_post_delete_student, internal_post_update_student,
        },
    },
    state::RosterState,
};
use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

pub mod api;
pub mod export;
pub mod index;
pub mod sse;
pub mod students;

const REQUEST_BODY_LIMIT: usize = 64 * 1024;

pub fn router(state: RosterState) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/api/students", get(get_students).post(post_student))
        .route(
            "/api/students/export",
            get(get_students_csv)
                .patch(mutate_export_path)
                .delete(mutate_export_path),
        )
        .route(
            "/api/students/{id}",
            patch(patch_student).delete(delete_student),
        )
        .route("/internal/students", get(internal_get_students))
        .route(
            "/internal/students/{id}/update",
            post(internal_post_update_student),
        )
        .route(
            "/internal/students/{id}/delete",
            post(internal_post_delete_student),
        )
        .route("/sse_feed", get(sse_feed))
        .layer(RequestBodyLimitLayer::new(REQUEST_BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
