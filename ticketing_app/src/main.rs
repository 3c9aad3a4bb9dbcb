// ticketing_app/src/main.rs

mod config;
mod db;
mod errors;
mod pipelines;
mod services;
mod state;
mod web;


use crate::config::{AppConfig, StoreBackend};
use crate::db::PgStore;
use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::Pipelines;
use crate::services::cart_sessions::CartSessions;
use crate::services::image_fetcher::HttpImageFetcher;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use boxoffice::report::PdfRenderer;
use boxoffice::{InMemoryStore, TicketStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

async fn open_store(config: &AppConfig) -> AppResult<Arc<dyn TicketStore>> {
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::info!("Using the in-memory store; data will not survive a restart.");
      Ok(Arc::new(InMemoryStore::new()))
    }
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
      let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      let store = PgStore::new(pool);
      store.ensure_schema().await?;
      Ok(Arc::new(store))
    }
  }
}

async fn build_state(config: Arc<AppConfig>) -> AppResult<AppState> {
  let store = open_store(&config).await?;

  if config.seed_db {
    db::seed::seed_catalog(store.as_ref()).await?;
  }

  let fetcher = HttpImageFetcher::new(config.image_fetch_timeout, &config.image_fetch_user_agent)
    .map_err(|e| AppError::Config(format!("Could not build the image fetch client: {}", e)))?;

  Ok(AppState {
    store,
    fetcher: Arc::new(fetcher),
    renderer: Arc::new(PdfRenderer::default()),
    carts: CartSessions::new(),
    pipelines: Arc::new(Pipelines::build()?),
    config,
  })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting ticketing application server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let app_state = match build_state(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize application state.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
