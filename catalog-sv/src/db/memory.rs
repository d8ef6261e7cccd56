//! In-process [`Catalog`] used by the handler and action tests.
//!
//! Mirrors the constraints the migrations and queries put on the real
//! tables: ordinal title ordering, case-insensitive unique titles and genre
//! names (folded over full Unicode, as `lower()` does under a UTF-8 locale),
//! and foreign keys from movies to genres and languages.

use std::sync::Mutex;

use crate::core::{Genre, GenreChangeset, Language, Movie, MovieChangeset, MovieDetails, NewGenre, NewMovie};
use crate::core::error::Error;
use crate::db::Catalog;

#[derive(Default)]
struct Tables {
    movies: Vec<Movie>,
    genres: Vec<Genre>,
    languages: Vec<Language>,
    next_movie_id: i32,
    next_genre_id: i32,
}

pub struct MemoryCatalog {
    tables: Mutex<Tables>,
    broken: bool,
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn broken() -> Error {
    Error::DBQueryError(diesel::result::Error::RollbackTransaction)
}

impl MemoryCatalog {
    pub fn new() -> Self {
        MemoryCatalog {
            tables: Mutex::new(Tables {
                languages: vec![
                    Language { id: 1, name: "Português".to_string() },
                    Language { id: 2, name: "Inglês".to_string() },
                ],
                next_movie_id: 1,
                next_genre_id: 1,
                ..Tables::default()
            }),
            broken: false,
        }
    }

    /// A catalog whose every call fails as if the database were unreachable.
    pub fn unreachable() -> Self {
        MemoryCatalog { broken: true, ..MemoryCatalog::new() }
    }

    pub fn with_genre(self, name: &str) -> Self {
        self.create_genre(NewGenre { name: name.to_string() })
            .expect("seed genre");
        self
    }

    pub fn with_movie(self, title: &str, genre_id: i32, language_id: i32, release_date: &str) -> Self {
        self.create_movie(NewMovie {
            title: title.to_string(),
            genre_id,
            language_id,
            oscar_count: 0,
            release_date: release_date.parse().expect("seed release date"),
        }).expect("seed movie");
        self
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, Error> {
        if self.broken {
            return Err(broken());
        }
        Ok(self.tables.lock().unwrap())
    }
}

impl Tables {
    fn details(&self, movie: &Movie) -> MovieDetails {
        let genre = self.genres.iter().find(|g| g.id == movie.genre_id).cloned();
        let language = self.languages.iter().find(|l| l.id == movie.language_id).cloned();
        MovieDetails {
            movie: movie.clone(),
            genre: genre.expect("movie genre"),
            language: language.expect("movie language"),
        }
    }

    fn check_references(&self, genre_id: i32, language_id: i32) -> Result<(), Error> {
        let genre_exists = self.genres.iter().any(|g| g.id == genre_id);
        let language_exists = self.languages.iter().any(|l| l.id == language_id);
        if genre_exists && language_exists {
            Ok(())
        } else {
            Err(Error::DBQueryError(diesel::result::Error::NotFound))
        }
    }

    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.movies.iter().any(|m| Some(m.id) != except && same_text(&m.title, title))
    }

    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.genres.iter().any(|g| Some(g.id) != except && same_text(&g.name, name))
    }

    fn sorted_details<'a>(&self, movies: impl Iterator<Item = &'a Movie>) -> Vec<MovieDetails> {
        let mut details: Vec<MovieDetails> = movies.map(|m| self.details(m)).collect();
        details.sort_by(|a, b| a.movie.title.cmp(&b.movie.title));
        details
    }
}

impl Catalog for MemoryCatalog {
    fn find_movies(&self) -> Result<Vec<MovieDetails>, Error> {
        let tables = self.tables()?;
        Ok(tables.sorted_details(tables.movies.iter()))
    }

    fn find_movies_by_genre_name(&self, genre_name: &str) -> Result<Vec<MovieDetails>, Error> {
        let tables = self.tables()?;
        let genre_ids: Vec<i32> = tables.genres.iter()
            .filter(|g| same_text(&g.name, genre_name))
            .map(|g| g.id)
            .collect();
        Ok(tables.sorted_details(tables.movies.iter().filter(|m| genre_ids.contains(&m.genre_id))))
    }

    fn find_one_movie(&self, movie_id: i32) -> Result<Option<Movie>, Error> {
        let tables = self.tables()?;
        Ok(tables.movies.iter().find(|m| m.id == movie_id).cloned())
    }

    fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, Error> {
        let tables = self.tables()?;
        Ok(tables.movies.iter().find(|m| same_text(&m.title, title)).cloned())
    }

    fn create_movie(&self, movie: NewMovie) -> Result<Movie, Error> {
        let mut tables = self.tables()?;
        tables.check_references(movie.genre_id, movie.language_id)?;
        if tables.title_taken(&movie.title, None) {
            return Err(Error::Conflict);
        }

        let created = Movie {
            id: tables.next_movie_id,
            title: movie.title,
            genre_id: movie.genre_id,
            language_id: movie.language_id,
            oscar_count: movie.oscar_count,
            release_date: movie.release_date,
        };
        tables.next_movie_id += 1;
        tables.movies.push(created.clone());
        Ok(created)
    }

    fn update_movie(&self, movie_id: i32, changes: MovieChangeset) -> Result<Movie, Error> {
        let mut tables = self.tables()?;
        let mut movie = tables.movies.iter().find(|m| m.id == movie_id).cloned()
            .ok_or(Error::DBQueryError(diesel::result::Error::NotFound))?;

        if let Some(title) = changes.title {
            if tables.title_taken(&title, Some(movie_id)) {
                return Err(Error::Conflict);
            }
            movie.title = title;
        }
        movie.genre_id = changes.genre_id.unwrap_or(movie.genre_id);
        movie.language_id = changes.language_id.unwrap_or(movie.language_id);
        movie.oscar_count = changes.oscar_count.unwrap_or(movie.oscar_count);
        movie.release_date = changes.release_date.unwrap_or(movie.release_date);
        tables.check_references(movie.genre_id, movie.language_id)?;

        for stored in tables.movies.iter_mut().filter(|m| m.id == movie_id) {
            *stored = movie.clone();
        }
        Ok(movie)
    }

    fn delete_movie(&self, movie_id: i32) -> Result<bool, Error> {
        let mut tables = self.tables()?;
        let before = tables.movies.len();
        tables.movies.retain(|m| m.id != movie_id);
        Ok(tables.movies.len() < before)
    }

    fn find_one_genre(&self, genre_id: i32) -> Result<Option<Genre>, Error> {
        let tables = self.tables()?;
        Ok(tables.genres.iter().find(|g| g.id == genre_id).cloned())
    }

    fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, Error> {
        let tables = self.tables()?;
        Ok(tables.genres.iter().find(|g| same_text(&g.name, name)).cloned())
    }

    fn create_genre(&self, genre: NewGenre) -> Result<Genre, Error> {
        let mut tables = self.tables()?;
        if tables.name_taken(&genre.name, None) {
            return Err(Error::Conflict);
        }

        let created = Genre { id: tables.next_genre_id, name: genre.name };
        tables.next_genre_id += 1;
        tables.genres.push(created.clone());
        Ok(created)
    }

    fn update_genre(&self, genre_id: i32, changes: GenreChangeset) -> Result<Genre, Error> {
        let mut tables = self.tables()?;
        if tables.name_taken(&changes.name, Some(genre_id)) {
            return Err(Error::Conflict);
        }

        let genre = tables.genres.iter_mut().find(|g| g.id == genre_id)
            .ok_or(Error::DBQueryError(diesel::result::Error::NotFound))?;
        genre.name = changes.name;
        Ok(genre.clone())
    }
}
