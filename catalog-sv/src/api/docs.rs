use actix_web::{get, HttpResponse};

const OPENAPI: &str = include_str!("openapi.json");

#[get("/api-docs")]
pub async fn api_docs() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(OPENAPI)
}
