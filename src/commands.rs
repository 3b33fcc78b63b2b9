//! One-shot subcommands that talk to the backend without the TUI.

use crate::api::{CatalogError, MovieBackend};
use crate::catalog::CatalogState;
use crate::movie::{DraftFields, MovieId, MovieRecord};
use std::io::Write;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Backend(#[from] CatalogError),

    #[error("title, year and genre must all be non-empty")]
    EmptyField,

    #[error("movie {0} not found")]
    NotFound(MovieId),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Backend(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Load the catalog and print the movies matching `search`.
pub async fn list(
    backend: &dyn MovieBackend,
    search: &str,
    out: &mut dyn Write,
) -> Result<usize, CommandError> {
    let mut state = CatalogState::default();
    state.replace(backend.list().await?);

    let visible = state.filter(search);
    if visible.is_empty() {
        writeln!(out, "{}", crate::view::EMPTY_MESSAGE)?;
    }
    for movie in &visible {
        writeln!(out, "{:>6}  {}", movie.id, movie.display_line())?;
    }
    Ok(visible.len())
}

pub async fn add(backend: &dyn MovieBackend, fields: DraftFields) -> Result<MovieRecord, CommandError> {
    let draft = fields.into_draft().ok_or(CommandError::EmptyField)?;
    let created = backend.create(&draft).await?;
    info!(id = %created.id, "created movie");
    Ok(created)
}

/// Update a movie, keeping current values for fields that are not given.
pub async fn edit(
    backend: &dyn MovieBackend,
    id: MovieId,
    title: Option<String>,
    year: Option<String>,
    genre: Option<String>,
) -> Result<MovieRecord, CommandError> {
    let mut state = CatalogState::default();
    state.replace(backend.list().await?);
    let current = state.find(&id).ok_or_else(|| CommandError::NotFound(id.clone()))?;

    let mut fields = current.to_fields();
    if let Some(title) = title {
        fields.title = title;
    }
    if let Some(year) = year {
        fields.year = year;
    }
    if let Some(genre) = genre {
        fields.genre = genre;
    }

    let draft = fields.into_draft().ok_or(CommandError::EmptyField)?;
    let updated = backend.update(&id, &draft).await?;
    info!(id = %id, "updated movie");
    Ok(updated)
}

pub async fn delete(backend: &dyn MovieBackend, id: MovieId) -> Result<(), CommandError> {
    backend.delete(&id).await?;
    info!(id = %id, "deleted movie");
    Ok(())
}
