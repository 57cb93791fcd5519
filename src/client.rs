use crate::{
    data::student::Student,
    error::{RequestSnafu, RosterResult, UnsuccessfulStatusSnafu},
};
use snafu::{ResultExt, ensure};

/// Extra attempts made by [`StudentsClient::fetch_students`] after the first failure.
const RETRIES: usize = 1;

/// Reads the student listing from a remote roster API, e.g. `http://localhost:4000/api`.
#[derive(Clone, Debug)]
pub struct StudentsClient {
    http: reqwest::Client,
    base_url: String,
}

impl StudentsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn students_url(&self) -> String {
        format!("{}/students", self.base_url.trim_end_matches('/'))
    }

    pub async fn try_fetch_students(&self) -> RosterResult<Vec<Student>> {
        let url = self.students_url();

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context(RequestSnafu { url: url.clone() })?;

        let status = response.status();
        ensure!(
            status.is_success(),
            UnsuccessfulStatusSnafu {
                status,
                url: url.clone()
            }
        );

        //an empty backend list can come back as `null`
        let students: Option<Vec<Student>> =
            response.json().await.context(RequestSnafu { url })?;
        Ok(students.unwrap_or_default())
    }

    /// Never fails: after the retry is spent the error is logged and the list is empty.
    pub async fn fetch_students(&self) -> Vec<Student> {
        let mut attempt = 0;
        loop {
            match self.try_fetch_students().await {
                Ok(students) => return students,
                Err(e) if attempt < RETRIES => {
                    attempt += 1;
                    warn!(?e, attempt, "Error fetching students, retrying");
                }
                Err(e) => {
                    error!(?e, "Error fetching students");
                    return vec![];
                }
            }
        }
    }
}
