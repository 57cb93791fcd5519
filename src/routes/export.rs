use crate::{
    data::student::Student,
    error::{CsvFlushSnafu, CsvSnafu, RosterResult},
    state::RosterState,
};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use snafu::ResultExt;

const CSV_HEADERS: [&str; 6] = [
    "id",
    "firstName",
    "lastName",
    "phoneNumber",
    "email",
    "address",
];

pub fn students_to_csv(students: &[Student]) -> RosterResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(CSV_HEADERS).context(CsvSnafu)?;
    for student in students {
        wtr.serialize(student).context(CsvSnafu)?;
    }

    wtr.into_inner()
        .map_err(|e| e.into_error())
        .context(CsvFlushSnafu)
}

pub async fn get_students_csv(State(state): State<RosterState>) -> RosterResult<impl IntoResponse> {
    let students = state.store().get_all().await?;
    let csv = students_to_csv(&students)?;

    info!(count = students.len(), "Exported students");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    ))
}
