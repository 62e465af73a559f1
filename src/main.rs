use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod config;
mod docs;
mod model;
mod report;
mod routes;
mod state;
mod store;
mod utils;

use config::Config;
use state::AppState;
use store::init_store;

use crate::docs::ApiDoc;
use crate::utils::source_cache::SourceCache;
use crate::utils::spreadsheet::SheetLayout;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leave Tracker"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let sources = SourceCache::new(
        config.source_cache_capacity,
        Duration::from_secs(config.source_cache_ttl_secs),
    );
    let store = init_store(&config, &sources).await?;

    let state = Data::new(AppState::new(
        store,
        sources,
        SheetLayout {
            skip_columns: config.skip_columns,
        },
    ));

    if state.store.is_empty() {
        warn!("No leave records loaded; upload a workbook or apply for leave to populate the calendar");
    }

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();
    info!(addr = %server_addr, records = state.store.len(), "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
