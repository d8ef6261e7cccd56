use log::{debug, info};

use crate::core::{CreateMovieParams, Genre, GenreChangeset, GenreParams, Movie, MovieDetails, NewGenre, UpdateMovieParams};
use crate::core::error::Error;
use crate::db::Catalog;

pub fn find_movies(catalog: &dyn Catalog) -> Result<Vec<MovieDetails>, Error> {
    info!("finding movies");
    catalog.find_movies()
}

pub fn find_movies_by_genre(catalog: &dyn Catalog, genre_name: &str) -> Result<Vec<MovieDetails>, Error> {
    info!("finding movies genre_name={}", genre_name);
    catalog.find_movies_by_genre_name(genre_name)
}

pub fn create_movie(catalog: &dyn Catalog, movie: CreateMovieParams) -> Result<Movie, Error> {
    info!("creating movie {:?}", movie);
    let title = movie.title.as_deref().ok_or(Error::MissingField("title"))?;

    if let Some(existing) = catalog.find_movie_by_title(title)? {
        debug!("title already used by movie id={}", existing.id);
        return Err(Error::Conflict);
    }

    catalog.create_movie(movie.create()?)
}

pub fn update_movie(catalog: &dyn Catalog, id: i32, movie: UpdateMovieParams) -> Result<Movie, Error> {
    info!("updating movie id={} {:?}", id, movie);
    let current = catalog.find_one_movie(id)?.ok_or(Error::NotFound)?;

    let changes = movie.update()?;
    if changes.is_empty() {
        debug!("nothing to update for movie id={}", id);
        return Ok(current);
    }

    if let Some(title) = changes.title.as_deref() {
        let taken = catalog.find_movie_by_title(title)?
            .map_or(false, |other| other.id != id);
        if taken {
            return Err(Error::Conflict);
        }
    }

    catalog.update_movie(id, changes)
}

pub fn delete_movie(catalog: &dyn Catalog, id: i32) -> Result<(), Error> {
    debug!("deleting movie id={}", id);
    catalog.find_one_movie(id)?.ok_or(Error::NotFound)?;

    if !catalog.delete_movie(id)? {
        return Err(Error::NotFound);
    }

    info!("deleted movie id={}", id);
    Ok(())
}

pub fn create_genre(catalog: &dyn Catalog, genre: GenreParams) -> Result<Genre, Error> {
    info!("creating genre {:?}", genre);
    let name = genre.name()?;

    if catalog.find_genre_by_name(name)?.is_some() {
        return Err(Error::Conflict);
    }

    catalog.create_genre(NewGenre { name: name.to_string() })
}

pub fn update_genre(catalog: &dyn Catalog, id: i32, genre: GenreParams) -> Result<Genre, Error> {
    info!("updating genre id={} {:?}", id, genre);
    let name = genre.name()?;

    catalog.find_one_genre(id)?.ok_or(Error::NotFound)?;

    let taken = catalog.find_genre_by_name(name)?
        .map_or(false, |other| other.id != id);
    if taken {
        return Err(Error::Conflict);
    }

    catalog.update_genre(id, GenreChangeset { name: name.to_string() })
}
