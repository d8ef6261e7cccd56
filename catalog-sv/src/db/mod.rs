use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::DatabaseErrorKind;
use diesel::sql_types::Text;
use log::debug;
use r2d2::Pool;

use crate::core::{Genre, GenreChangeset, Language, Movie, MovieChangeset, MovieDetails, NewGenre, NewMovie};
use crate::core::error::Error;
use crate::core::error::Error::{Conflict, DBQueryError};

pub mod schema;
#[cfg(test)]
pub mod memory;

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;
pub type DbConnectionPool = Pool<ConnectionManager<PgConnection>>;

sql_function!(fn lower(x: Text) -> Text);

/// Storage operations the catalog actions are built on.
///
/// Title and name lookups compare case-insensitively. Writes that would break
/// the case-insensitive uniqueness of movie titles or genre names fail with
/// [`Error::Conflict`].
pub trait Catalog: Send + Sync {
    /// Every movie with its genre and language, ordered by title.
    fn find_movies(&self) -> Result<Vec<MovieDetails>, Error>;
    fn find_movies_by_genre_name(&self, genre_name: &str) -> Result<Vec<MovieDetails>, Error>;
    fn find_one_movie(&self, movie_id: i32) -> Result<Option<Movie>, Error>;
    fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, Error>;
    fn create_movie(&self, movie: NewMovie) -> Result<Movie, Error>;
    fn update_movie(&self, movie_id: i32, changes: MovieChangeset) -> Result<Movie, Error>;
    /// Returns whether a row was removed.
    fn delete_movie(&self, movie_id: i32) -> Result<bool, Error>;

    fn find_one_genre(&self, genre_id: i32) -> Result<Option<Genre>, Error>;
    fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>, Error>;
    fn create_genre(&self, genre: NewGenre) -> Result<Genre, Error>;
    fn update_genre(&self, genre_id: i32, changes: GenreChangeset) -> Result<Genre, Error>;
}

// byte order whatever the database collation; title itself keeps the default
// collation so lower() folds accented capitals
fn by_title() -> SqlLiteral<Text> {
    sql::<Text>(r#"movies.title COLLATE "C""#)
}

// unique indexes on lower(title) and lower(name) back the pre-insert checks
fn translate(err: diesel::result::Error) -> Error {
    match err {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Conflict,
        other => DBQueryError(other),
    }
}

/// [`Catalog`] backed by PostgreSQL through a pooled diesel connection.
pub struct PgCatalog {
    pool: DbConnectionPool,
}

impl PgCatalog {
    pub fn new(pool: DbConnectionPool) -> Self {
        PgCatalog { pool }
    }

    fn conn(&self) -> Result<DbConnection, Error> {
        Ok(self.pool.get()?)
    }
}

impl Catalog for PgCatalog {
    fn find_movies(&self) -> Result<Vec<MovieDetails>, Error> {
        use schema::{genres, languages, movies};

        let conn = self.conn()?;

        let query = movies::table
            .inner_join(genres::table)
            .inner_join(languages::table)
            .order(by_title());

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .load::<(Movie, Genre, Language)>(&conn)
            .map(|rows| rows.into_iter().map(MovieDetails::from).collect())
            .map_err(DBQueryError)
    }

    fn find_movies_by_genre_name(&self, genre_name: &str) -> Result<Vec<MovieDetails>, Error> {
        use schema::{genres, languages, movies};

        let conn = self.conn()?;

        let query = movies::table
            .inner_join(genres::table)
            .inner_join(languages::table)
            .filter(lower(genres::name).eq(lower(genre_name)))
            .order(by_title());

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .load::<(Movie, Genre, Language)>(&conn)
            .map(|rows| rows.into_iter().map(MovieDetails::from).collect())
            .map_err(DBQueryError)
    }

    fn find_one_movie(&self, movie_id: i32) -> Result<Option<Movie>, Error> {
        use schema::movies::dsl::*;

        let conn = self.conn()?;

        movies.find(movie_id)
            .first(&conn)
            .optional()
            .map_err(DBQueryError)
    }

    fn find_movie_by_title(&self, movie_title: &str) -> Result<Option<Movie>, Error> {
        use schema::movies::dsl::*;

        let conn = self.conn()?;

        let query = movies.filter(lower(title).eq(lower(movie_title)));

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .first(&conn)
            .optional()
            .map_err(DBQueryError)
    }

    fn create_movie(&self, movie: NewMovie) -> Result<Movie, Error> {
        use schema::movies;

        let conn = self.conn()?;

        let query = diesel::insert_into(movies::table)
            .values(&movie);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .get_result(&conn)
            .map_err(translate)
    }

    fn update_movie(&self, movie_id: i32, changes: MovieChangeset) -> Result<Movie, Error> {
        use schema::movies::dsl::*;

        let conn = self.conn()?;

        let query = diesel::update(movies.find(movie_id))
            .set(&changes);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .get_result(&conn)
            .map_err(translate)
    }

    fn delete_movie(&self, movie_id: i32) -> Result<bool, Error> {
        use schema::movies::dsl::*;

        let conn = self.conn()?;

        let query = diesel::delete(movies.find(movie_id));

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .execute(&conn)
            .map_err(DBQueryError)
            .map(|r| r > 0)
    }

    fn find_one_genre(&self, genre_id: i32) -> Result<Option<Genre>, Error> {
        use schema::genres::dsl::*;

        let conn = self.conn()?;

        genres.find(genre_id)
            .first(&conn)
            .optional()
            .map_err(DBQueryError)
    }

    fn find_genre_by_name(&self, genre_name: &str) -> Result<Option<Genre>, Error> {
        use schema::genres::dsl::*;

        let conn = self.conn()?;

        let query = genres.filter(lower(name).eq(lower(genre_name)));

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .first(&conn)
            .optional()
            .map_err(DBQueryError)
    }

    fn create_genre(&self, genre: NewGenre) -> Result<Genre, Error> {
        use schema::genres;

        let conn = self.conn()?;

        let query = diesel::insert_into(genres::table)
            .values(&genre);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .get_result(&conn)
            .map_err(translate)
    }

    fn update_genre(&self, genre_id: i32, changes: GenreChangeset) -> Result<Genre, Error> {
        use schema::genres::dsl::*;

        let conn = self.conn()?;

        let query = diesel::update(genres.find(genre_id))
            .set(&changes);

        debug!("{}", diesel::debug_query::<Pg, _>(&query));

        query
            .get_result(&conn)
            .map_err(translate)
    }
}
