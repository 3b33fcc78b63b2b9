//! In-memory backend shared by the unit tests.

use crate::api::{CatalogError, MovieBackend};
use crate::movie::{MovieDraft, MovieId, MovieRecord};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

pub fn movie(id: i64, title: &str, year: i32, genre: &str) -> MovieRecord {
    MovieRecord {
        id: MovieId::from(id),
        title: title.to_string(),
        year: Some(year),
        genre: genre.to_string(),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    movies: Mutex<Vec<MovieRecord>>,
    next_id: AtomicI64,
    fail_list: AtomicBool,
    fail_mutations: AtomicBool,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_movies(movies: Vec<MovieRecord>) -> Arc<Self> {
        let backend = Self::default();
        backend.next_id.store(1000, Ordering::SeqCst);
        *backend.movies.lock().unwrap() = movies;
        Arc::new(backend)
    }

    pub fn movies(&self) -> Vec<MovieRecord> {
        self.movies.lock().unwrap().clone()
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_mutations(&self) -> Result<(), CatalogError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(CatalogError::Response {
                status: 500,
                body: "mutation rejected".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn not_found() -> CatalogError {
    CatalogError::Response {
        status: 404,
        body: "Not Found".to_string(),
    }
}

#[async_trait]
impl MovieBackend for FakeBackend {
    async fn list(&self) -> Result<Vec<MovieRecord>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(CatalogError::Transport("connection refused".to_string()));
        }
        Ok(self.movies())
    }

    async fn create(&self, draft: &MovieDraft) -> Result<MovieRecord, CatalogError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutations()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = MovieRecord {
            id: MovieId::from(id),
            title: draft.title.clone(),
            year: draft.year,
            genre: draft.genre.clone(),
        };
        self.movies.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &MovieId, draft: &MovieDraft) -> Result<MovieRecord, CatalogError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutations()?;
        let mut movies = self.movies.lock().unwrap();
        let movie = movies.iter_mut().find(|m| &m.id == id).ok_or_else(not_found)?;
        movie.title = draft.title.clone();
        movie.year = draft.year;
        movie.genre = draft.genre.clone();
        Ok(movie.clone())
    }

    async fn delete(&self, id: &MovieId) -> Result<(), CatalogError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutations()?;
        let mut movies = self.movies.lock().unwrap();
        let before = movies.len();
        movies.retain(|m| &m.id != id);
        if movies.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
