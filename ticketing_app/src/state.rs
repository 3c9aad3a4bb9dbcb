// ticketing_app/src/state.rs
use crate::config::AppConfig;
use crate::pipelines::Pipelines;
use crate::services::cart_sessions::CartSessions;
use boxoffice::report::{DocumentRenderer, ImageFetcher};
use boxoffice::TicketStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn TicketStore>,
  pub fetcher: Arc<dyn ImageFetcher>,
  pub renderer: Arc<dyn DocumentRenderer>,
  pub carts: CartSessions,
  pub pipelines: Arc<Pipelines>,
  pub config: Arc<AppConfig>,
}
