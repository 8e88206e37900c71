use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::other(e.to_string())
    })?;

    let db_pool = web::Data::new(state.db_pool);
    let cache = web::Data::new(state.cache);
    let run_repository = web::Data::new(state.run_repository);
    let discovery_service = web::Data::from(state.discovery_service);
    let keyword_service = web::Data::from(state.keyword_service);

    tracing::info!("Starting market intelligence server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(cache.clone())
            .app_data(run_repository.clone())
            .app_data(discovery_service.clone())
            .app_data(keyword_service.clone())
            .configure(api::competitors::configure)
            .configure(api::keywords::configure)
            .configure(api::runs::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
