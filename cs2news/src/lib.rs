pub mod handlers;
pub mod news;
use std::io;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, middleware::Logger, web};
use log::info;

use crate::news::config::AppConfig;

pub use crate::news::{extract_images, format, format_document, preview};

pub async fn run() -> io::Result<()> {
    let config = AppConfig::load();
    let server_cfg = config.server.clone();

    info!(
        "cs2news is listening on: http://{}:{}",
        server_cfg.host, server_cfg.port
    );

    // Shared by every worker; handlers only read it.
    let formatter = web::Data::new(config.formatter.clone());
    let max_bytes = server_cfg.max_payload_bytes();
    let cors_origins = server_cfg.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(formatter.clone())
            .app_data(handlers::json_config(max_bytes))
            .wrap(build_cors(&cors_origins))
            .configure(handlers::config)
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await
}

fn build_cors(origins: &[String]) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_any_origin();
    }

    origins
        .iter()
        .fold(base, |c, origin| c.allowed_origin(origin))
}
