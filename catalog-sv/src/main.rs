#[macro_use]
extern crate diesel;
extern crate env_logger;
extern crate log;

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, middleware};
use actix_web::web::Data;
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use log::info;

use crate::config::Settings;
use crate::db::{Catalog, PgCatalog};

mod api;
mod config;
mod core;
mod db;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG",
      format!("{}actix_web=debug", std::env::var("RUST_LOG")
          .map_or_else(|_| "info,".to_string(), |ll| format!("{},", ll))
      ));
    env_logger::init();

    let settings = Settings::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pg_mgr = ConnectionManager::<PgConnection>::new(settings.database_url.as_str());
    let pg_pool = r2d2::Pool::builder()
        .max_size(settings.pool_size)
        .build(pg_mgr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let catalog: Arc<dyn Catalog> = Arc::new(PgCatalog::new(pg_pool));
    let catalog = Data::from(catalog);
    let features = settings.features;

    info!("Starting server at: {} {:?}", &settings.bind_address, features);

    HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .wrap(middleware::Logger::default())
            .configure(|cfg| api::configure(cfg, features))
    })
    .bind(&settings.bind_address)?
    .max_connections(1000)
    .run()
    .await?;

    // the last app clone drops with the workers, closing pooled connections
    info!("Server stopped, database pool released");
    Ok(())
}
