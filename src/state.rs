use crate::{
    client::StudentsClient,
    config::RuntimeConfiguration,
    data::student::Student,
    error::RosterResult,
    routes::sse::SseEvent,
    store::StudentStore,
};
use maud::{DOCTYPE, Markup, html};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast::{Receiver, Sender, channel};

#[derive(Clone, Debug)]
pub struct RosterState {
    store: StudentStore,
    remote_api: Option<StudentsClient>,
    sse_events_sender: Sender<SseEvent>,
}

impl RosterState {
    pub async fn new(options: PgPoolOptions, config: &RuntimeConfiguration) -> RosterResult<Self> {
        let store = match config.db_config() {
            Some(db_config) => {
                info!("Using PostgreSQL student store");
                StudentStore::postgres(options, &db_config.get_db_path()).await?
            }
            None => {
                warn!("No `DB_PATH` configured, students are kept in memory only");
                StudentStore::in_memory()
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: StudentStore, config: &RuntimeConfiguration) -> Self {
        let remote_api = config.api_base_url().map(StudentsClient::new);
        if let Some(client) = &remote_api {
            info!(url = %client.students_url(), "Students page reads from a remote API");
        }

        let (tx, _rx) = channel(16);

        Self {
            store,
            remote_api,
            sse_events_sender: tx,
        }
    }

    pub const fn store(&self) -> &StudentStore {
        &self.store
    }

    /// Students for display: load failures are logged and shown as an empty list.
    pub async fn students_for_display(&self) -> Vec<Student> {
        if let Some(client) = &self.remote_api {
            return client.fetch_students().await;
        }

        match self.store.get_all().await {
            Ok(students) => students,
            Err(e) => {
                error!(?e, "Error fetching students");
                vec![]
            }
        }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Roster" }
                }
                body hx-ext="sse" class="bg-white text-gray-900" {
                    (markup)
                }
            }
        }
    }

    pub fn subscribe_to_sse_feed(&self) -> Receiver<SseEvent> {
        self.sse_events_sender.subscribe()
    }

    pub fn send_sse_event(&self, event: SseEvent) {
        let _ = self.sse_events_sender.send(event);
    }
}
