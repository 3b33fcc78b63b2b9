use crate::config::{Config, ConfigError};
use crate::movie::{MovieDraft, MovieId, MovieRecord};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure of a single backend call. Every variant is handled the same way
/// by callers: logged, and prior state left untouched.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No response was received (connection refused, DNS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived with a non-success status.
    #[error("backend responded HTTP {status}: {body}")]
    Response { status: u16, body: String },

    /// The response body was not the JSON shape we expected.
    #[error("unexpected response body: {0}")]
    Parse(String),
}

impl CatalogError {
    /// Short message for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Transport(msg) => format!("Backend unreachable: {}", msg),
            CatalogError::Response { status, .. } => format!("Backend rejected request (HTTP {})", status),
            CatalogError::Parse(msg) => format!("Malformed backend response: {}", msg),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Transport(e.to_string())
    }
}

/// The movie resource as seen by the client.
#[async_trait]
pub trait MovieBackend: Send + Sync {
    /// Fetch the whole collection, in backend order.
    async fn list(&self) -> Result<Vec<MovieRecord>, CatalogError>;

    /// Create a movie. The backend assigns the id.
    async fn create(&self, draft: &MovieDraft) -> Result<MovieRecord, CatalogError>;

    /// Replace title, year and genre of an existing movie.
    async fn update(&self, id: &MovieId, draft: &MovieDraft) -> Result<MovieRecord, CatalogError>;

    async fn delete(&self, id: &MovieId) -> Result<(), CatalogError>;
}

/// `MovieBackend` over a JSON REST resource.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let base_url = config.api_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, id: &MovieId) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

/// Turn a non-success status into `CatalogError::Response`.
async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(CatalogError::Response {
            status: status.as_u16(),
            body,
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse(e.to_string()))
}

#[async_trait]
impl MovieBackend for HttpBackend {
    async fn list(&self) -> Result<Vec<MovieRecord>, CatalogError> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        read_json(check_status(response).await?).await
    }

    async fn create(&self, draft: &MovieDraft) -> Result<MovieRecord, CatalogError> {
        let response = self
            .client
            .post(self.base_url.clone())
            .json(draft)
            .send()
            .await?;
        read_json(check_status(response).await?).await
    }

    async fn update(&self, id: &MovieId, draft: &MovieDraft) -> Result<MovieRecord, CatalogError> {
        let response = self.client.put(self.item_url(id)?).json(draft).send().await?;
        read_json(check_status(response).await?).await
    }

    async fn delete(&self, id: &MovieId) -> Result<(), CatalogError> {
        let response = self.client.delete(self.item_url(id)?).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Store {
        movies: Arc<Mutex<Vec<MovieRecord>>>,
        next_id: Arc<Mutex<i64>>,
    }

    async fn list_movies(State(store): State<Store>) -> Json<Vec<MovieRecord>> {
        Json(store.movies.lock().unwrap().clone())
    }

    async fn create_movie(
        State(store): State<Store>,
        Json(draft): Json<MovieDraft>,
    ) -> (StatusCode, Json<MovieRecord>) {
        let id = {
            let mut next = store.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let record = MovieRecord {
            id: MovieId::from(id),
            title: draft.title,
            year: draft.year,
            genre: draft.genre,
        };
        store.movies.lock().unwrap().push(record.clone());
        (StatusCode::CREATED, Json(record))
    }

    async fn update_movie(
        State(store): State<Store>,
        Path(id): Path<String>,
        Json(draft): Json<MovieDraft>,
    ) -> Result<Json<MovieRecord>, StatusCode> {
        let mut movies = store.movies.lock().unwrap();
        let movie = movies
            .iter_mut()
            .find(|m| m.id.as_str() == id)
            .ok_or(StatusCode::NOT_FOUND)?;
        movie.title = draft.title;
        movie.year = draft.year;
        movie.genre = draft.genre;
        Ok(Json(movie.clone()))
    }

    async fn delete_movie(State(store): State<Store>, Path(id): Path<String>) -> StatusCode {
        let mut movies = store.movies.lock().unwrap();
        let before = movies.len();
        movies.retain(|m| m.id.as_str() != id);
        if movies.len() == before {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        }
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    async fn spawn_movie_server() -> (HttpBackend, Store) {
        let store = Store::default();
        let router = Router::new()
            .route("/movies", get(list_movies).post(create_movie))
            .route("/movies/:id", axum::routing::put(update_movie).delete(delete_movie))
            .with_state(store.clone());
        let base = spawn_server(router).await;
        (backend_for(&format!("{base}/movies")), store)
    }

    fn backend_for(url: &str) -> HttpBackend {
        let config = Config {
            api_url: url.to_string(),
            ..Config::default()
        };
        HttpBackend::new(&config).expect("backend")
    }

    fn dune() -> MovieDraft {
        MovieDraft {
            title: "Dune".to_string(),
            genre: "Sci-Fi".to_string(),
            year: Some(1984),
        }
    }

    #[tokio::test]
    async fn test_list_empty_catalog() {
        let (backend, _store) = spawn_movie_server().await;
        let movies = backend.list().await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let (backend, _store) = spawn_movie_server().await;
        let created = backend.create(&dune()).await.unwrap();
        assert_eq!(created.title, "Dune");

        let movies = backend.list().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, created.id);
        assert_eq!(movies[0].genre, "Sci-Fi");
        assert_eq!(movies[0].year, Some(1984));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (backend, _store) = spawn_movie_server().await;
        let created = backend.create(&dune()).await.unwrap();
        let draft = MovieDraft {
            title: "Dune".to_string(),
            genre: "Space Opera".to_string(),
            year: Some(2021),
        };
        let updated = backend.update(&created.id, &draft).await.unwrap();
        assert_eq!(updated.year, Some(2021));
        assert_eq!(backend.list().await.unwrap()[0].genre, "Space Opera");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_response_failure() {
        let (backend, _store) = spawn_movie_server().await;
        let err = backend.delete(&MovieId::from("404")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Response { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_movie() {
        let (backend, store) = spawn_movie_server().await;
        let created = backend.create(&dune()).await.unwrap();
        backend.delete(&created.id).await.unwrap();
        assert!(store.movies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_failure() {
        let router = Router::new().route("/movies", get(|| async { "definitely not json" }));
        let base = spawn_server(router).await;
        let backend = backend_for(&format!("{base}/movies"));
        let err = backend.list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_response_failure() {
        let router = Router::new().route(
            "/movies",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_server(router).await;
        let backend = backend_for(&format!("{base}/movies"));
        match backend.list().await.unwrap_err() {
            CatalogError::Response { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("Expected Response failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = backend_for(&format!("http://{addr}/movies"));
        let err = backend.list().await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }

    #[test]
    fn test_item_url_appends_id_segment() {
        let backend = backend_for("http://localhost:3000/movies/");
        let url = backend.item_url(&MovieId::from("a b")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/movies/a%20b");

        let backend = backend_for("http://localhost:3000/movies");
        let url = backend.item_url(&MovieId::from(3)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/movies/3");
    }

    #[test]
    fn test_user_message_mentions_status() {
        let err = CatalogError::Response {
            status: 404,
            body: String::new(),
        };
        assert!(err.user_message().contains("404"));
    }
}
