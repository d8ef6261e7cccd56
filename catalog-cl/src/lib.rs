use chrono::NaiveDate;
use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CatalogError::{Rejected, UnexpectedStatusCode};

pub struct CatalogConfig {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
    #[serde(rename = "genres")]
    pub genre: Genre,
    #[serde(rename = "languages")]
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub genre_id: i32,
    pub language_id: i32,
    pub oscar_count: i32,
    pub release_date: NaiveDate,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateMovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscar_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenreRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("error calling server: {0}")]
    ClientError(#[from] reqwest::Error),
    #[error("server refused request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("unexpected status code: {0}")]
    UnexpectedStatusCode(StatusCode),
}

// error replies carry {"message": ...}; anything else is reported by status alone
async fn rejection(res: Response) -> CatalogError {
    let status = res.status();
    match res.json::<Message>().await {
        Ok(body) => Rejected { status, message: body.message },
        Err(_) => UnexpectedStatusCode(status),
    }
}

async fn expect_message(res: Response) -> Result<String, CatalogError> {
    if res.status() == StatusCode::OK {
        Ok(res.json::<Message>().await?.message)
    } else {
        Err(rejection(res).await)
    }
}

pub async fn list_movies(cfg: &CatalogConfig) -> Result<Vec<Movie>, CatalogError> {
    debug!("listing movies from {}", cfg.url);
    let res = reqwest::Client::new()
        .get(format!("{}/movies", cfg.url))
        .header("Accept", "application/json")
        .send()
        .await?;

    if res.status() == StatusCode::OK {
        Ok(res.json().await?)
    } else {
        Err(rejection(res).await)
    }
}

pub async fn list_movies_by_genre(
    cfg: &CatalogConfig,
    genre_name: &str,
) -> Result<Vec<Movie>, CatalogError> {
    let genre = utf8_percent_encode(genre_name, NON_ALPHANUMERIC);
    debug!("listing movies of genre {} from {}", genre, cfg.url);
    let res = reqwest::Client::new()
        .get(format!("{}/movies/{}", cfg.url, genre))
        .header("Accept", "application/json")
        .send()
        .await?;

    if res.status() == StatusCode::OK {
        Ok(res.json().await?)
    } else {
        Err(rejection(res).await)
    }
}

pub async fn create_movie(
    cfg: &CatalogConfig,
    req: &CreateMovieRequest,
) -> Result<(), CatalogError> {
    let res = reqwest::Client::new()
        .post(format!("{}/movies", cfg.url))
        .json(req)
        .header("Accept", "application/json")
        .send()
        .await?;

    if res.status() == StatusCode::CREATED {
        Ok(())
    } else {
        Err(rejection(res).await)
    }
}

pub async fn update_movie(
    cfg: &CatalogConfig,
    id: i32,
    req: &UpdateMovieRequest,
) -> Result<String, CatalogError> {
    let res = reqwest::Client::new()
        .put(format!("{}/movies/{}", cfg.url, id))
        .json(req)
        .header("Accept", "application/json")
        .send()
        .await?;

    expect_message(res).await
}

pub async fn delete_movie(
    cfg: &CatalogConfig,
    id: i32,
) -> Result<String, CatalogError> {
    let res = reqwest::Client::new()
        .delete(format!("{}/movies/{}", cfg.url, id))
        .header("Accept", "application/json")
        .send()
        .await?;

    expect_message(res).await
}

pub async fn create_genre(
    cfg: &CatalogConfig,
    req: &GenreRequest,
) -> Result<Genre, CatalogError> {
    let res = reqwest::Client::new()
        .post(format!("{}/genres", cfg.url))
        .json(req)
        .header("Accept", "application/json")
        .send()
        .await?;

    if res.status() == StatusCode::CREATED {
        Ok(res.json().await?)
    } else {
        Err(rejection(res).await)
    }
}

pub async fn update_genre(
    cfg: &CatalogConfig,
    id: i32,
    req: &GenreRequest,
) -> Result<String, CatalogError> {
    let res = reqwest::Client::new()
        .put(format!("{}/genres/{}", cfg.url, id))
        .json(req)
        .header("Accept", "application/json")
        .send()
        .await?;

    expect_message(res).await
}
