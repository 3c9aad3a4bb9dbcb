// ticketing_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Where entities and orders are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl StoreBackend {
  pub fn as_str(self) -> &'static str {
    match self {
      StoreBackend::Postgres => "postgres",
      StoreBackend::Memory => "memory",
    }
  }
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required when `store_backend` is `Postgres`.
  pub database_url: Option<String>,
  pub image_fetch_timeout: Duration,
  pub image_fetch_user_agent: String,
  /// Seed a demo catalog on startup.
  pub seed_db: bool,
}

pub const DEFAULT_USER_AGENT: &str = "TicketsPro-ReportBuilder/1.0";

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = get_env("STORE_BACKEND")
      .unwrap_or_else(|_| "postgres".to_string())
      .parse::<StoreBackend>()?;
    let database_url = match store_backend {
      StoreBackend::Postgres => Some(get_env("DATABASE_URL")?),
      StoreBackend::Memory => get_env("DATABASE_URL").ok(),
    };

    let timeout_secs = get_env("IMAGE_FETCH_TIMEOUT_SECS")
      .unwrap_or_else(|_| "10".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid IMAGE_FETCH_TIMEOUT_SECS: {}", e)))?;
    if timeout_secs == 0 {
      return Err(AppError::Config("IMAGE_FETCH_TIMEOUT_SECS must be at least 1".to_string()));
    }
    let image_fetch_user_agent = get_env("IMAGE_FETCH_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(backend = ?store_backend, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      image_fetch_timeout: Duration::from_secs(timeout_secs),
      image_fetch_user_agent,
      seed_db,
    })
  }

  /// In-memory store, short fetch timeout. Used by handler tests.
  #[cfg(test)]
  pub fn for_memory() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      store_backend: StoreBackend::Memory,
      database_url: None,
      image_fetch_timeout: Duration::from_secs(2),
      image_fetch_user_agent: DEFAULT_USER_AGENT.to_string(),
      seed_db: false,
    }
  }
}
