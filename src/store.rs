use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::{
        MakeQuerySnafu, MigrateSnafu, MissingStudentSnafu, OpenDatabaseSnafu, RosterResult,
        StudentIdsExhaustedSnafu,
    },
};
use snafu::{OptionExt, ResultExt};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::sync::Arc;
use tokio::sync::RwLock;

const STUDENT_COLUMNS: &str = "id, first_name, last_name, phone_number, email, address";

/// Where student records live. Cloning shares the same underlying records.
#[derive(Clone, Debug)]
pub enum StudentStore {
    InMemory(Arc<RwLock<InMemoryStudents>>),
    Postgres(Pool<Postgres>),
}

#[derive(Debug)]
pub struct InMemoryStudents {
    students: Vec<Student>,
    next_id: i32,
}

impl Default for InMemoryStudents {
    fn default() -> Self {
        Self {
            students: vec![],
            next_id: 1,
        }
    }
}

impl StudentStore {
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::default())
    }

    pub async fn postgres(options: PgPoolOptions, db_path: &str) -> RosterResult<Self> {
        let pool = options.connect(db_path).await.context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self::Postgres(pool))
    }

    /// All students, oldest id first.
    pub async fn get_all(&self) -> RosterResult<Vec<Student>> {
        match self {
            Self::InMemory(students) => Ok(students.read().await.students.clone()),
            Self::Postgres(pool) => {
                sqlx::query_as::<_, Student>(&format!(
                    "SELECT {STUDENT_COLUMNS} FROM public.students ORDER BY id"
                ))
                .fetch_all(pool)
                .await
                .context(MakeQuerySnafu)
            }
        }
    }

    pub async fn get_by_id(&self, id: i32) -> RosterResult<Option<Student>> {
        match self {
            Self::InMemory(students) => Ok(students
                .read()
                .await
                .students
                .iter()
                .find(|student| student.id == id)
                .cloned()),
            Self::Postgres(pool) => {
                sqlx::query_as::<_, Student>(&format!(
                    "SELECT {STUDENT_COLUMNS} FROM public.students WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(pool)
                .await
                .context(MakeQuerySnafu)
            }
        }
    }

    /// Stores an already-validated student and returns it with its new id.
    pub async fn insert(&self, to_be_added: NewStudent) -> RosterResult<Student> {
        let NewStudent {
            first_name,
            last_name,
            phone_number,
            email,
            address,
        } = to_be_added;

        match self {
            Self::InMemory(students) => {
                let mut students = students.write().await;
                let id = students.next_id;
                let next_id = id.checked_add(1).context(StudentIdsExhaustedSnafu)?;
                let student = Student {
                    id,
                    first_name,
                    last_name,
                    phone_number,
                    email,
                    address,
                };
                students.next_id = next_id;
                students.students.push(student.clone());
                Ok(student)
            }
            Self::Postgres(pool) => sqlx::query_as::<_, Student>(&format!(
                "INSERT INTO public.students (first_name, last_name, phone_number, email, address) VALUES ($1, $2, $3, $4, $5) RETURNING {STUDENT_COLUMNS}"
            ))
            .bind(first_name)
            .bind(last_name)
            .bind(phone_number)
            .bind(email)
            .bind(address)
            .fetch_one(pool)
            .await
            .context(MakeQuerySnafu),
        }
    }

    /// Applies an already-validated patch, failing with `MissingStudent` for unknown ids.
    pub async fn update(&self, id: i32, patch: StudentPatch) -> RosterResult<Student> {
        match self {
            Self::InMemory(students) => {
                let mut students = students.write().await;
                let student = students
                    .students
                    .iter_mut()
                    .find(|student| student.id == id)
                    .context(MissingStudentSnafu { id })?;
                patch.apply_to(student);
                Ok(student.clone())
            }
            Self::Postgres(pool) => {
                let StudentPatch {
                    first_name,
                    last_name,
                    phone_number,
                    email,
                    address,
                } = patch;

                sqlx::query_as::<_, Student>(&format!(
                    "UPDATE public.students SET first_name = COALESCE($2, first_name), last_name = COALESCE($3, last_name), phone_number = COALESCE($4, phone_number), email = COALESCE($5, email), address = COALESCE($6, address) WHERE id = $1 RETURNING {STUDENT_COLUMNS}"
                ))
                .bind(id)
                .bind(first_name)
                .bind(last_name)
                .bind(phone_number)
                .bind(email)
                .bind(address)
                .fetch_optional(pool)
                .await
                .context(MakeQuerySnafu)?
                .context(MissingStudentSnafu { id })
            }
        }
    }

    pub async fn remove(&self, id: i32) -> RosterResult<()> {
        let removed = match self {
            Self::InMemory(students) => {
                let mut students = students.write().await;
                let before = students.students.len();
                students.students.retain(|student| student.id != id);
                students.students.len() != before
            }
            Self::Postgres(pool) => {
                sqlx::query("DELETE FROM public.students WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await
                    .context(MakeQuerySnafu)?
                    .rows_affected()
                    > 0
            }
        };

        snafu::ensure!(removed, MissingStudentSnafu { id });
        Ok(())
    }
}
