use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/movies";
const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "movie-catalog.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid API URL '{0}'")]
    InvalidApiUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                format!("Config file {} is not valid JSON: {}", path.display(), source)
            }
            ConfigError::InvalidApiUrl(url) => {
                format!("'{}' is not an http(s) URL", url)
            }
            ConfigError::HttpClient(e) => format!("HTTP client setup failed: {}", e),
        }
    }
}

/// Client configuration. Loaded from a JSON file, then overridden by CLI
/// flags and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Movie collection endpoint; item URLs are `{api_url}/{id}`.
    pub api_url: String,
    /// Per-request timeout. Unset means no timeout.
    pub timeout_secs: Option<u64>,
    /// Where the TUI writes its log. Defaults to the cache directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
            log_file: None,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "movie-catalog", "movie-catalog")
}

impl Config {
    /// Platform config file location, e.g. `~/.config/movie-catalog/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file just yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply_overrides(
        &mut self,
        api_url: Option<String>,
        timeout_secs: Option<u64>,
        log_file: Option<PathBuf>,
    ) {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
    }

    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_url)
            .map_err(|_| ConfigError::InvalidApiUrl(self.api_url.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidApiUrl(self.api_url.clone())),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolved log file path, if any location is available.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE_NAME)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:3000/movies");
        assert!(config.timeout().is_none());
        assert!(config.api_url().is_ok());
    }

    #[test]
    fn test_config_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_url": "https://movies.example.com/api/movies", "timeout_secs": 5}}"#)
            .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api_url, "https://movies.example.com/api/movies");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_config_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_config_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "api_url = nope").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.user_message().contains("not valid JSON"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = Config {
            api_url: "http://file.example/movies".to_string(),
            timeout_secs: Some(10),
            log_file: None,
        };
        config.apply_overrides(Some("http://cli.example/movies".to_string()), None, None);
        assert_eq!(config.api_url, "http://cli.example/movies");
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_api_url_rejects_non_http() {
        let config = Config {
            api_url: "mailto:someone@example.com".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.api_url(), Err(ConfigError::InvalidApiUrl(_))));

        let config = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.api_url().is_err());
    }
}
