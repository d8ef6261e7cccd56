use actix_web::{delete, get, post, put, HttpMessage, HttpRequest, HttpResponse, Responder, web};
use actix_web::error::JsonPayloadError;
use actix_web::web::{Bytes, Json};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Features;
use crate::core::{CreateMovieParams, GenreParams, UpdateMovieParams};
use crate::core::action;
use crate::core::error::Error;
use crate::db::Catalog;

pub use self::error::{ApiError, MessageBody};

mod docs;
mod error;
pub mod messages;

/// Runs a blocking catalog action on actix's thread pool.
async fn run<F, T>(catalog: web::Data<dyn Catalog>, f: F) -> Result<T, Error>
    where
        F: FnOnce(&dyn Catalog) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
{
    web::block(move || f(catalog.get_ref()))
        .await
        .map_err(|_| Error::BlockingCanceled)?
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("rejected body for {} {}: {}", req.method(), req.path(), err);
    ApiError::bad_request(messages::INVALID_BODY).into()
}

/// Decodes a movie body. Only JSON that does not parse is the caller's
/// fault; a wrong content type or mistyped fields fail the route like any
/// other error. An empty body reads as `{}`.
fn read_movie<T: DeserializeOwned>(content_type: &str, body: &[u8]) -> Result<T, Error> {
    if content_type != "application/json" {
        return Err(Error::UnsupportedContentType(content_type.to_string()));
    }

    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(body).map_err(Error::MalformedBody)?
    };

    serde_json::from_value(value).map_err(Error::BodyError)
}

/// Mounts the catalog routes; genre management and the API document only
/// when enabled.
pub fn configure(cfg: &mut web::ServiceConfig, features: Features) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(health)
        .service(get_movies)
        .service(get_movies_by_genre)
        .service(post_movie)
        .service(put_movie)
        .service(delete_movie);

    if features.genres {
        cfg.service(post_genre)
            .service(put_genre);
    }

    if features.docs {
        cfg.service(docs::api_docs);
    }
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok()
}

#[get("/movies")]
pub async fn get_movies(
    catalog: web::Data<dyn Catalog>,
) -> Result<HttpResponse, ApiError> {
    let movies = run(catalog, action::find_movies)
        .await
        .map_err(|e| {
            error!("{}", e);
            ApiError::internal(messages::MOVIES_LIST_FAILED)
        })?;

    Ok(HttpResponse::Ok().json(movies))
}

#[get("/movies/{genre_name}")]
pub async fn get_movies_by_genre(
    catalog: web::Data<dyn Catalog>,
    genre_name: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let movies = run(catalog, move |c| action::find_movies_by_genre(c, &genre_name))
        .await
        .map_err(|e| {
            error!("{}", e);
            ApiError::internal(messages::MOVIES_FILTER_FAILED)
        })?;

    Ok(HttpResponse::Ok().json(movies))
}

#[post("/movies")]
pub async fn post_movie(
    catalog: web::Data<dyn Catalog>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    let content_type = req.content_type().to_string();
    let created = run(catalog, move |c| {
        let movie: CreateMovieParams = read_movie(&content_type, &body)?;
        action::create_movie(c, movie)
    }).await;

    match created {
        Ok(_) => Ok(HttpResponse::Created().finish()),
        Err(e @ Error::MalformedBody(_)) => {
            warn!("{}", e);
            Err(ApiError::bad_request(messages::INVALID_BODY))
        }
        Err(Error::Conflict) => Err(ApiError::conflict(messages::MOVIE_ALREADY_EXISTS)),
        Err(e) => {
            error!("{}", e);
            Err(ApiError::internal(messages::MOVIE_CREATE_FAILED))
        }
    }
}

#[put("/movies/{movie_id}")]
pub async fn put_movie(
    catalog: web::Data<dyn Catalog>,
    movie_id: web::Path<String>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    let content_type = req.content_type().to_string();
    let updated = run(catalog, move |c| {
        let movie: UpdateMovieParams = read_movie(&content_type, &body)?;
        action::update_movie(c, movie_id.parse()?, movie)
    }).await;

    match updated {
        Ok(_) => Ok(HttpResponse::Ok().json(MessageBody::new(messages::MOVIE_UPDATED))),
        Err(e @ Error::MalformedBody(_)) => {
            warn!("{}", e);
            Err(ApiError::bad_request(messages::INVALID_BODY))
        }
        Err(Error::NotFound) => Err(ApiError::not_found(messages::MOVIE_NOT_FOUND)),
        Err(Error::Conflict) => Err(ApiError::conflict(messages::MOVIE_ALREADY_EXISTS)),
        Err(e) => {
            error!("{}", e);
            Err(ApiError::internal(messages::MOVIE_UPDATE_FAILED))
        }
    }
}

#[delete("/movies/{movie_id}")]
pub async fn delete_movie(
    catalog: web::Data<dyn Catalog>,
    movie_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let deleted = run(catalog, move |c| action::delete_movie(c, movie_id.parse()?)).await;

    match deleted {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageBody::new(messages::MOVIE_DELETED))),
        Err(Error::NotFound) => Err(ApiError::not_found(messages::MOVIE_NOT_FOUND)),
        Err(e) => {
            error!("{}", e);
            Err(ApiError::internal(messages::MOVIE_DELETE_FAILED))
        }
    }
}

#[post("/genres")]
pub async fn post_genre(
    catalog: web::Data<dyn Catalog>,
    req: Json<GenreParams>,
) -> Result<HttpResponse, ApiError> {
    let created = run(catalog, move |c| action::create_genre(c, req.into_inner())).await;

    match created {
        Ok(genre) => Ok(HttpResponse::Created().json(genre)),
        Err(Error::MissingField(_)) => Err(ApiError::bad_request(messages::GENRE_NAME_REQUIRED)),
        Err(Error::Conflict) => Err(ApiError::conflict(messages::GENRE_ALREADY_EXISTS)),
        Err(e) => {
            error!("{}", e);
            Err(ApiError::internal(messages::GENRE_CREATE_FAILED).with_detail(e.to_string()))
        }
    }
}

#[put("/genres/{genre_id}")]
pub async fn put_genre(
    catalog: web::Data<dyn Catalog>,
    genre_id: web::Path<String>,
    req: Json<GenreParams>,
) -> Result<HttpResponse, ApiError> {
    let updated = run(catalog, move |c| {
        let genre = req.into_inner();
        genre.name()?;
        action::update_genre(c, genre_id.parse()?, genre)
    }).await;

    match updated {
        Ok(_) => Ok(HttpResponse::Ok().json(MessageBody::new(messages::GENRE_UPDATED))),
        Err(Error::MissingField(_)) => Err(ApiError::bad_request(messages::GENRE_NAME_REQUIRED)),
        Err(Error::NotFound) => Err(ApiError::not_found(messages::GENRE_NOT_FOUND)),
        Err(Error::Conflict) => Err(ApiError::conflict(messages::GENRE_ALREADY_EXISTS)),
        Err(e) => {
            error!("{}", e);
            Err(ApiError::internal(messages::GENRE_UPDATE_FAILED))
        }
    }
}
