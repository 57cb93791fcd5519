use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::{InvalidBodySnafu, InvalidStudentIdSnafu, RosterError, RosterResult},
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use snafu::ResultExt;

#[derive(Serialize)]
pub struct DeleteResponse {
    success: bool,
}

pub fn parse_id(id: String) -> RosterResult<i32> {
    let parsed = id.trim().parse::<i32>();
    parsed.context(InvalidStudentIdSnafu { original: id })
}

/// `/api/students/export` shadows `/api/students/{id}`, so writes to it answer like any bad id.
pub async fn mutate_export_path() -> RosterError {
    parse_id("export".to_string()).map_or_else(|e| e, |id| RosterError::MissingStudent { id })
}

pub async fn get_students(State(state): State<RosterState>) -> RosterResult<Json<Vec<Student>>> {
    Ok(Json(state.store().get_all().await?))
}

pub async fn post_student(
    State(state): State<RosterState>,
    body: Result<Json<NewStudent>, JsonRejection>,
) -> RosterResult<(StatusCode, Json<Student>)> {
    let Json(new_student) = body.context(InvalidBodySnafu)?;
    let new_student = new_student.validated()?;

    let student = state.store().insert(new_student).await?;
    info!(id = student.id, "Added student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn patch_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    body: Result<Json<StudentPatch>, JsonRejection>,
) -> RosterResult<Json<Student>> {
    let id = parse_id(id)?;
    let Json(patch) = body.context(InvalidBodySnafu)?;
    let patch = patch.validated()?;

    let student = state.store().update(id, patch).await?;
    info!(id, "Updated student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<DeleteResponse>> {
    let id = parse_id(id)?;

    state.store().remove(id).await?;
    info!(id, "Removed student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use crate::{
        routes::{
            sse::SseEvent,
            testing::{send_json, send_raw, test_state},
        },
        state::RosterState,
    };
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    fn grace() -> Value {
        json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "phoneNumber": "2025550143",
            "email": "grace@example.org",
            "address": "Arlington, VA"
        })
    }

    async fn create(state: &RosterState, body: Value) -> (StatusCode, Value) {
        send_json(state.clone(), Method::POST, "/api/students", Some(body)).await
    }

    #[tokio::test]
    async fn empty_listing_is_an_array() {
        let (status, body) = send_json(test_state(), Method::GET, "/api/students", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_then_list() {
        let state = test_state();
        let (status, created) = create(&state, grace()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["firstName"], "Grace");

        let (status, listed) = send_json(state, Method::GET, "/api/students", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_id() {
        let state = test_state();
        let mut body = grace();
        body["id"] = json!(99);

        let (_, created) = create(&state, body).await;
        assert_eq!(created["id"], 1);
    }

    #[tokio::test]
    async fn create_rejects_bad_input_with_messages() {
        let state = test_state();
        let cases = [
            (json!({}), "Student First Name is required"),
            (
                json!({"firstName": "Grace", "lastName": "Hopper"}),
                "Student Phone Number is required",
            ),
            (
                json!({"firstName": "Grace", "lastName": "Hopper", "phoneNumber": "12345"}),
                "Invalid phone number format",
            ),
            (
                json!({"firstName": "Grace", "lastName": "Hopper", "phoneNumber": "2025550143"}),
                "Student Email is required",
            ),
            (
                json!({"firstName": "Grace", "lastName": "Hopper", "phoneNumber": "2025550143", "email": "grace@example.org"}),
                "Student Address is required",
            ),
            (json!([1, 2, 3]), "Invalid request body"),
        ];

        for (body, message) in cases {
            let (status, error) = create(&state, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
            assert_eq!(error, json!({ "error": message }));
        }

        let (_, listed) = send_json(state, Method::GET, "/api/students", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_body() {
        let (status, error) = send_raw(
            test_state(),
            Method::POST,
            "/api/students",
            "{\"firstName\": ",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error, json!({ "error": "Invalid request body" }));
    }

    #[tokio::test]
    async fn malformed_patch_body_is_invalid_body() {
        let state = test_state();
        create(&state, grace()).await;

        for body in ["{\"firstName\": ", "[1]"] {
            let (status, error) =
                send_raw(state.clone(), Method::PATCH, "/api/students/1", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(error, json!({ "error": "Invalid request body" }));
        }

        let (_, listed) = send_json(state, Method::GET, "/api/students", None).await;
        assert_eq!(listed[0]["firstName"], "Grace");
    }

    #[tokio::test]
    async fn export_is_not_a_student_id() {
        let state = test_state();
        create(&state, grace()).await;

        for method in [Method::PATCH, Method::DELETE] {
            let (status, error) =
                send_raw(state.clone(), method.clone(), "/api/students/export", "{}").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(error, json!({"error": "Invalid student ID"}));
        }

        let (_, listed) = send_json(state, Method::GET, "/api/students", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn patch_updates_only_provided_fields() {
        let state = test_state();
        create(&state, grace()).await;

        let (status, updated) = send_json(
            state.clone(),
            Method::PATCH,
            "/api/students/1",
            Some(json!({"lastName": "Murray Hopper", "email": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["lastName"], "Murray Hopper");
        assert_eq!(updated["email"], "grace@example.org");
        assert_eq!(updated["firstName"], "Grace");
    }

    #[tokio::test]
    async fn rejected_patch_changes_nothing() {
        let state = test_state();
        create(&state, grace()).await;

        let (status, error) = send_json(
            state.clone(),
            Method::PATCH,
            "/api/students/1",
            Some(json!({"firstName": "Amazing", "phoneNumber": "123"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "Invalid phone number format");

        let (_, listed) = send_json(state, Method::GET, "/api/students", None).await;
        assert_eq!(listed[0]["firstName"], "Grace");
    }

    #[tokio::test]
    async fn patch_and_delete_reject_bad_ids() {
        let state = test_state();

        let (status, error) = send_json(
            state.clone(),
            Method::PATCH,
            "/api/students/abc",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error, json!({"error": "Invalid student ID"}));

        let (status, error) =
            send_json(state.clone(), Method::DELETE, "/api/students/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error, json!({"error": "Invalid student ID"}));

        let (status, error) = send_json(
            state.clone(),
            Method::PATCH,
            "/api/students/5",
            Some(json!({"firstName": "Nobody"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error, json!({"error": "Student not found"}));

        let (status, error) = send_json(state, Method::DELETE, "/api/students/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error, json!({"error": "Student not found"}));
    }

    #[tokio::test]
    async fn delete_removes_and_never_reuses_id() {
        let state = test_state();
        create(&state, grace()).await;
        create(&state, grace()).await;

        let (status, body) = send_json(state.clone(), Method::DELETE, "/api/students/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, created) = create(&state, grace()).await;
        assert_eq!(created["id"], 3);

        let (_, listed) = send_json(state, Method::GET, "/api/students", None).await;
        let ids: Vec<_> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|student| student["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [2_i64, 3]);
    }

    #[tokio::test]
    async fn mutations_notify_sse_subscribers() {
        let state = test_state();
        let mut rx = state.subscribe_to_sse_feed();

        create(&state, grace()).await;
        send_json(
            state.clone(),
            Method::PATCH,
            "/api/students/1",
            Some(json!({"address": "Pentagon"})),
        )
        .await;
        send_json(state.clone(), Method::DELETE, "/api/students/1", None).await;

        for _ in 0..3 {
            assert_eq!(rx.recv().await.unwrap(), SseEvent::CrudStudent);
        }

        create(&state, json!({})).await;
        assert!(rx.try_recv().is_err());
    }
}
