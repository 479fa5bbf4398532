#![deny(missing_docs)]
//! Catalog health server executable.
//!
//! Hosts HTTP endpoints scoring catalog entities for completeness, version
//! drift, status progress and freshness.

mod config;
mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use catalog_health_core::SystemClock;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::routes::{
    AppState, entity_report, freshness, openapi_json, score_completeness, score_version_health,
    status_progress, status_rollup, usage,
};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let (model_spec, product_spec) = config.load_specs().map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(
        model_spec,
        product_spec,
        Arc::new(SystemClock::new()),
    ));

    let ServerConfig {
        host,
        port,
        ui_origins,
        ..
    } = config;
    log::info!("catalog health server listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &ui_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(score_completeness)
                .service(score_version_health)
                .service(status_progress)
                .service(status_rollup)
                .service(freshness)
                .service(usage)
                .service(entity_report)
                .service(openapi_json)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
