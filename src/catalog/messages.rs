use crate::api::CatalogError;
use crate::movie::{MovieId, MovieRecord};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Which mutation a completion belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update(MovieId),
    Delete(MovieId),
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update(_) => "update",
            Mutation::Delete(_) => "delete",
        }
    }
}

/// Completions sent from request tasks back to the UI loop.
#[derive(Debug)]
pub enum CatalogEvent {
    /// A list request finished with the full collection.
    Loaded(Vec<MovieRecord>),

    LoadFailed(CatalogError),

    /// A mutation was accepted by the backend.
    Mutated(Mutation),

    MutationFailed(Mutation, CatalogError),
}

pub type EventSender = UnboundedSender<CatalogEvent>;
pub type EventReceiver = UnboundedReceiver<CatalogEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
