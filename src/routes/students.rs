use crate::{
    data::student::Student,
    error::RosterResult,
    maud_conveniences::{centered_note, render_table, title},
    routes::api::parse_id,
    state::RosterState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use maud::{Markup, html};

pub async fn internal_get_students(State(state): State<RosterState>) -> Markup {
    let students = state.students_for_display().await;
    render_students(students)
}

pub fn render_students(students: Vec<Student>) -> Markup {
    html! {
        (title("Students List"))

        @if students.is_empty() {
            (centered_note("No students found"))
        } @else {
            (render_table(
                ["First Name", "Last Name", "Email", "Phone Number", "Address", "Actions"],
                students
                    .into_iter()
                    .map(|student| {
                        let actions = student_actions(student.id);
                        [
                            html! {(student.first_name)},
                            html! {(student.last_name)},
                            html! {(student.email)},
                            html! {(student.phone_number)},
                            html! {(student.address)},
                            actions,
                        ]
                    })
                    .collect(),
            ))
        }
    }
}

fn student_actions(id: i32) -> Markup {
    html! {
        div class="flex justify-center space-x-2" {
            button hx-post={"/internal/students/" (id) "/update"} hx-swap="none" class="text-blue-500 hover:text-blue-700 transition" title="Update Student" {
                "Edit"
            }
            button hx-post={"/internal/students/" (id) "/delete"} hx-swap="none" class="text-red-500 hover:text-red-700 transition" title="Delete Student" {
                "Delete"
            }
        }
    }
}

//the row buttons only record the request for now, nothing is changed
pub async fn internal_post_update_student(Path(id): Path<String>) -> RosterResult<StatusCode> {
    let id = parse_id(id)?;
    info!(id, "Update student requested");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn internal_post_delete_student(Path(id): Path<String>) -> RosterResult<StatusCode> {
    let id = parse_id(id)?;
    info!(id, "Delete student requested");
    Ok(StatusCode::NO_CONTENT)
}
