use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend-assigned identifier of a movie.
///
/// Backends disagree on whether ids are numbers or strings, so both are
/// accepted and compared by their text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        MovieId(s.to_string())
    }
}

impl From<String> for MovieId {
    fn from(s: String) -> Self {
        MovieId(s)
    }
}

impl From<i64> for MovieId {
    fn from(n: i64) -> Self {
        MovieId(n.to_string())
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => MovieId::from(n),
            RawId::Text(s) => MovieId(s),
        })
    }
}

/// A single movie as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// `None` when the backend stored a year that was not a number.
    #[serde(default)]
    pub year: Option<i32>,
    pub genre: String,
}

impl MovieRecord {
    pub fn year_label(&self) -> String {
        match self.year {
            Some(y) => y.to_string(),
            None => "?".to_string(),
        }
    }

    /// One-line rendering used by the list and the `list` subcommand.
    pub fn display_line(&self) -> String {
        format!("{} ({}) - {}", self.title, self.year_label(), self.genre)
    }

    /// Raw form values for editing this record.
    pub fn to_fields(&self) -> DraftFields {
        DraftFields {
            title: self.title.clone(),
            year: self.year_label(),
            genre: self.genre.clone(),
        }
    }
}

/// Request body for create and update. The client never sends an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub genre: String,
    /// Serialized as `null` when the typed year was not a number.
    pub year: Option<i32>,
}

/// Form values exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub title: String,
    pub year: String,
    pub genre: String,
}

impl DraftFields {
    /// Returns `None` if any field is empty, which abandons the submission.
    pub fn into_draft(self) -> Option<MovieDraft> {
        let title = self.title.trim();
        let year = self.year.trim();
        let genre = self.genre.trim();
        if title.is_empty() || year.is_empty() || genre.is_empty() {
            return None;
        }
        Some(MovieDraft {
            title: title.to_string(),
            genre: genre.to_string(),
            year: parse_year(year),
        })
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.year.clear();
        self.genre.clear();
    }
}

/// Parse a year the lenient way browsers parse integers: leading whitespace
/// and sign are accepted, digits are consumed up to the first non-digit.
/// Text without leading digits is not a number.
pub fn parse_year(text: &str) -> Option<i32> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    let value = if negative { -value } else { value };
    i32::try_from(value).ok()
}
