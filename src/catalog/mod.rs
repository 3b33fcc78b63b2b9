mod messages;

pub use messages::{CatalogEvent, EventReceiver, EventSender, Mutation};

use crate::api::MovieBackend;
use crate::movie::{MovieDraft, MovieId, MovieRecord};
use std::sync::Arc;
use tracing::{error, info};

/// Movies matching `term` case-insensitively in title or genre, in the
/// original order. An empty term matches everything.
pub fn filter_movies(records: &[MovieRecord], term: &str) -> Vec<MovieRecord> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&term) || m.genre.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

/// Last collection fetched from the backend. Replaced wholesale on every
/// successful load; nothing patches individual records.
#[derive(Debug, Default)]
pub struct CatalogState {
    records: Vec<MovieRecord>,
}

impl CatalogState {
    pub fn replace(&mut self, records: Vec<MovieRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn find(&self, id: &MovieId) -> Option<&MovieRecord> {
        self.records.iter().find(|m| &m.id == id)
    }

    pub fn filter(&self, term: &str) -> Vec<MovieRecord> {
        filter_movies(self.records(), term)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// What applying a completion did, for the UI to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reloaded { count: usize },
    LoadFailed(String),
    /// The mutation succeeded and a reload has been issued.
    Mutated(Mutation),
    MutationFailed(Mutation, String),
}

/// Loader and mutator around the backend.
///
/// Requests run as spawned tasks and report back through the event channel;
/// only [`Catalog::apply`] writes the state, so all writes happen on the
/// thread that drains the channel.
pub struct Catalog {
    backend: Arc<dyn MovieBackend>,
    state: CatalogState,
    events: EventSender,
    loads_issued: u64,
}

impl Catalog {
    pub fn new(backend: Arc<dyn MovieBackend>) -> (Self, EventReceiver) {
        let (events, rx) = messages::channel();
        let catalog = Self {
            backend,
            state: CatalogState::default(),
            events,
            loads_issued: 0,
        };
        (catalog, rx)
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Number of list requests started so far.
    pub fn loads_issued(&self) -> u64 {
        self.loads_issued
    }

    /// Fetch the full collection. Completes with `Loaded` or `LoadFailed`.
    pub fn load(&mut self) {
        self.loads_issued += 1;
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match backend.list().await {
                Ok(records) => CatalogEvent::Loaded(records),
                Err(e) => CatalogEvent::LoadFailed(e),
            };
            let _ = events.send(event);
        });
    }

    pub fn create(&self, draft: MovieDraft) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match backend.create(&draft).await {
                Ok(_) => CatalogEvent::Mutated(Mutation::Create),
                Err(e) => CatalogEvent::MutationFailed(Mutation::Create, e),
            };
            let _ = events.send(event);
        });
    }

    pub fn update(&self, id: MovieId, draft: MovieDraft) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match backend.update(&id, &draft).await {
                Ok(_) => CatalogEvent::Mutated(Mutation::Update(id)),
                Err(e) => CatalogEvent::MutationFailed(Mutation::Update(id), e),
            };
            let _ = events.send(event);
        });
    }

    pub fn delete(&self, id: MovieId) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match backend.delete(&id).await {
                Ok(()) => CatalogEvent::Mutated(Mutation::Delete(id)),
                Err(e) => CatalogEvent::MutationFailed(Mutation::Delete(id), e),
            };
            let _ = events.send(event);
        });
    }

    /// Apply a completion. Loads replace the state, successful mutations
    /// issue exactly one reload, failures only log.
    pub fn apply(&mut self, event: CatalogEvent) -> Outcome {
        match event {
            CatalogEvent::Loaded(records) => {
                let count = records.len();
                info!(count, loads = self.loads_issued(), "loaded movies");
                self.state.replace(records);
                Outcome::Reloaded { count }
            }
            CatalogEvent::LoadFailed(e) => {
                error!(error = %e, "failed to load movies");
                Outcome::LoadFailed(e.user_message())
            }
            CatalogEvent::Mutated(mutation) => {
                info!(mutation = mutation.label(), "mutation accepted, reloading");
                self.load();
                Outcome::Mutated(mutation)
            }
            CatalogEvent::MutationFailed(mutation, e) => {
                error!(mutation = mutation.label(), error = %e, "mutation failed");
                Outcome::MutationFailed(mutation, e.user_message())
            }
        }
    }
}
