use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("record not found")]
    NotFound,
    #[error("record conflicts with an existing one")]
    Conflict,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("error parsing id: {0}")]
    IdParseError(#[from] std::num::ParseIntError),
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),
    #[error("error reading request body: {0}")]
    BodyError(#[source] serde_json::Error),
    #[error("unsupported content type {0:?}")]
    UnsupportedContentType(String),
    #[error("error parsing date: {0}")]
    DateParseError(#[from] chrono::ParseError),
    #[error("error querying database: {0}")]
    DBQueryError(#[from] diesel::result::Error),
    #[error("error getting connection from pool: {0}")]
    PoolError(#[from] r2d2::Error),
    #[error("blocking task was canceled")]
    BlockingCanceled,
}
