#[macro_use]
extern crate lazy_static;

use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpServer,
};
use log::info;
use sqlx::SqlitePool;
use tera::Tera;

mod config;
mod db;
mod errors;
mod placeholder;
mod routes;
mod seed;
mod structs;
mod utils;

use config::Config;

#[derive(Debug, Clone)]
pub struct AppState {
    db_pool: SqlitePool,
}

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = match Tera::new("templates/**/*") {
            Ok(t) => t,
            Err(e) => {
                log::error!("Parsing error(s): {}", e);
                ::std::process::exit(1);
            }
        };
        tera.autoescape_on(vec![".html"]);
        tera.register_filter("local_date", utils::local_date_filter);
        tera
    };
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load();

    // No connection is made here; a bad DATABASE_URL shows up on the first query.
    let db_pool = db::connect_lazy(&config).map_err(|e| {
        log::error!("FATAL: invalid DATABASE_URL: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;
    let state = AppState { db_pool };

    info!(
        "Starting HTTP server on http://{}:{}/",
        config.bind_addr, config.port
    );

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(Data::new(state.clone()))
            .configure(routes::configure)
            .default_service(web::to(routes::default_handler))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
