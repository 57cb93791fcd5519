use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    MissingEnvVar { name: &'static str },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unable to parse server address {:?}", original))]
    ParseServerIp {
        source: std::net::AddrParseError,
        original: String,
    },
    #[snafu(display("Invalid request body"))]
    InvalidBody { source: JsonRejection },
    #[snafu(display("Invalid student ID"))]
    InvalidStudentId {
        source: ParseIntError,
        original: String,
    },
    #[snafu(display("Student {} is required", field))]
    MissingField { field: &'static str },
    #[snafu(display("Invalid phone number format"))]
    InvalidPhoneNumber { length: usize },
    #[snafu(display("Invalid email format"))]
    InvalidEmail { source: email_address::Error },
    #[snafu(display("Student not found"))]
    MissingStudent { id: i32 },
    #[snafu(display("No student ids left to assign"))]
    StudentIdsExhausted,
    #[snafu(display("Error with CSVs"))]
    Csv { source: csv::Error },
    #[snafu(display("Error finishing CSV output"))]
    CsvFlush { source: std::io::Error },
    #[snafu(display("Error requesting students from {}", url))]
    Request { source: reqwest::Error, url: String },
    #[snafu(display("Students API at {} answered {}", url, status))]
    UnsuccessfulStatus {
        status: reqwest::StatusCode,
        url: String,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //upstream api

        let status_code = match &self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::MissingEnvVar { .. } => ISE,
            Self::ParsePort { .. } | Self::ParseServerIp { .. } => ISE,
            Self::InvalidBody { .. } => BI,
            Self::InvalidStudentId { .. } => BI,
            Self::MissingField { .. } => BI,
            Self::InvalidPhoneNumber { .. } => BI,
            Self::InvalidEmail { .. } => BI,
            Self::MissingStudent { .. } => NF,
            Self::StudentIdsExhausted => ISE,
            Self::Csv { .. } | Self::CsvFlush { .. } => ISE,
            Self::Request { .. } | Self::UnsuccessfulStatus { .. } => BG,
        };

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(?self, "Rejected request");
        }

        (
            status_code,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
