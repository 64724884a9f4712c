use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Entity;

/// Genres offered by the catalog filter.
pub const GENRES: [&str; 6] = [
    "Fiction",
    "Non-fiction",
    "Mystery",
    "Fantasy",
    "Science",
    "Romance",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Book {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            description: String::new(),
            genre: Vec::new(),
            published_year: None,
            created_by: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_genre(mut self, genre: Vec<String>) -> Self {
        self.genre = genre;
        self
    }

    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.published_year.map(|d| d.year())
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.iter().any(|g| g == genre)
    }
}

impl Entity for Book {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;

        if !self.author.is_empty() {
            writeln!(f, "Author: {}", self.author)?;
        }
        if let Some(year) = self.year() {
            writeln!(f, "Published: {}", year)?;
        }
        if !self.genre.is_empty() {
            writeln!(f, "Genre: {}", self.genre.join(", "))?;
        }
        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }

        Ok(())
    }
}

/// Body of `POST /book`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: Vec<String>,
    pub published_year: DateTime<Utc>,
}

impl BookPayload {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: String::new(),
            genre: Vec::new(),
            published_year: year_start(year),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_genre(mut self, genre: Vec<String>) -> Self {
        self.genre = genre;
        self
    }
}

/// Body of `PATCH /book/{id}`. Only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<DateTime<Utc>>,
}

impl BookUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.genre.is_none()
            && self.published_year.is_none()
    }
}

/// First instant of `year` in UTC. Falls back to the Unix epoch for years
/// chrono cannot represent.
pub fn year_start(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Splits form-style genre input ("Fiction, Mystery") into a clean list.
pub fn parse_genres<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
    inputs
        .iter()
        .flat_map(|s| s.as_ref().split(','))
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// Catalog genre filter. `all` matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(String),
}

impl GenreFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Genre(genre) => book.has_genre(genre),
        }
    }

    pub fn apply<'a>(&self, books: &'a [Book]) -> Vec<&'a Book> {
        books.iter().filter(|b| self.matches(b)).collect()
    }
}

impl FromStr for GenreFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            Ok(GenreFilter::All)
        } else {
            Ok(GenreFilter::Genre(s.to_string()))
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => write!(f, "all"),
            GenreFilter::Genre(genre) => write!(f, "{}", genre),
        }
    }
}
