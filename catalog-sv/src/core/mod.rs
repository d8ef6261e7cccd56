use chrono::{DateTime, NaiveDate};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::db::schema::{genres, languages, movies};

pub mod action;
pub mod error;

#[derive(Clone, Serialize, Deserialize, Identifiable, Queryable, PartialEq, Debug)]
#[table_name="languages"]
pub struct Language {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Serialize, Deserialize, Identifiable, Queryable, PartialEq, Debug)]
#[table_name="genres"]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Serialize, Deserialize, Identifiable, Queryable, PartialEq, Debug)]
#[table_name="movies"]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
}

/// A movie with its genre and language expanded inline, as listed by the API.
#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "genres")]
    pub genre: Genre,
    #[serde(rename = "languages")]
    pub language: Language,
}

impl From<(Movie, Genre, Language)> for MovieDetails {
    fn from((movie, genre, language): (Movie, Genre, Language)) -> Self {
        MovieDetails { movie, genre, language }
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="movies"]
pub struct NewMovie {
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, AsChangeset)]
#[table_name="movies"]
pub struct MovieChangeset {
    pub title: Option<String>,
    pub genre_id: Option<i32>,
    pub language_id: Option<i32>,
    pub oscar_count: Option<i32>,
    pub release_date: Option<NaiveDate>,
}

impl MovieChangeset {
    pub fn is_empty(&self) -> bool {
        *self == MovieChangeset::default()
    }
}

#[derive(Clone, Debug, Insertable)]
#[table_name="genres"]
pub struct NewGenre {
    pub name: String,
}

#[derive(Clone, Debug, AsChangeset)]
#[table_name="genres"]
pub struct GenreChangeset {
    pub name: String,
}

/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, which is
/// reduced to its UTC date.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc().date()))
        .map_err(Error::DateParseError)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateMovieParams {
    pub title: Option<String>,
    pub genre_id: Option<i32>,
    pub language_id: Option<i32>,
    pub oscar_count: Option<i32>,
    pub release_date: Option<String>,
}

impl CreateMovieParams {
    fn create(&self) -> Result<NewMovie, Error> {
        let release_date = self.release_date.as_deref()
            .ok_or(Error::MissingField("release_date"))?;

        Ok(NewMovie {
            title: self.title.clone().ok_or(Error::MissingField("title"))?,
            genre_id: self.genre_id.ok_or(Error::MissingField("genre_id"))?,
            language_id: self.language_id.ok_or(Error::MissingField("language_id"))?,
            oscar_count: self.oscar_count.unwrap_or(0),
            release_date: parse_release_date(release_date)?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateMovieParams {
    pub title: Option<String>,
    pub genre_id: Option<i32>,
    pub language_id: Option<i32>,
    pub oscar_count: Option<i32>,
    pub release_date: Option<String>,
}

impl UpdateMovieParams {
    fn update(&self) -> Result<MovieChangeset, Error> {
        // an empty date string leaves the stored date alone, same as omitting it
        let release_date = match self.release_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_release_date(raw)?),
        };

        Ok(MovieChangeset {
            title: self.title.clone(),
            genre_id: self.genre_id,
            language_id: self.language_id,
            oscar_count: self.oscar_count,
            release_date,
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenreParams {
    pub name: Option<String>,
}

impl GenreParams {
    pub fn name(&self) -> Result<&str, Error> {
        match self.name.as_deref() {
            None | Some("") => Err(Error::MissingField("name")),
            Some(name) => Ok(name),
        }
    }
}
