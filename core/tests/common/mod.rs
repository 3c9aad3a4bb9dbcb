// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every fixture.

use async_trait::async_trait;
use boxoffice::report::{DocumentRenderer, ImageFetcher, RenderedDocument, ReportDocument};
use boxoffice::{
  Actor, BoxOfficeError, Cinema, ContextData, EntityStore, FetchError, InMemoryStore, Movie, MovieCategory,
  PipelineControl, Producer,
};
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Level;

// --- Pipeline test context ---
#[derive(Clone, Debug, Default)]
pub struct StepLog {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
}

pub fn create_simple_handler(
  step_name: &'static str,
  message: &'static str,
) -> boxoffice::Handler<StepLog, BoxOfficeError> {
  Box::new(move |ctx: ContextData<StepLog>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, "executed");
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  reason: &'static str,
) -> boxoffice::Handler<StepLog, BoxOfficeError> {
  Box::new(move |ctx: ContextData<StepLog>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(BoxOfficeError::Validation(reason.to_string()))
    })
  })
}

// --- Tracing (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Catalog fixtures ---
pub fn dec(value: &str) -> Decimal {
  value.parse().expect("valid decimal literal")
}

pub fn movie(name: &str, price: &str) -> Movie {
  Movie {
    id: 0,
    name: name.to_string(),
    description: format!("{} description", name),
    price: dec(price),
    image_url: format!("https://img.test/{}.png", name.to_lowercase()),
    start_date: Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(),
    end_date: Utc.with_ymd_and_hms(2024, 2, 1, 22, 0, 0).unwrap(),
    category: MovieCategory::Drama,
    cinema_id: 1,
    producer_id: 1,
  }
}

pub fn actor(full_name: &str, picture: &str) -> Actor {
  Actor {
    id: 0,
    profile_picture_url: picture.to_string(),
    full_name: full_name.to_string(),
    bio: format!("{} bio", full_name),
  }
}

pub fn cinema(name: &str) -> Cinema {
  Cinema {
    id: 0,
    logo: format!("https://img.test/{}-logo.png", name.to_lowercase()),
    name: name.to_string(),
    description: format!("{} description", name),
  }
}

pub fn producer(full_name: &str) -> Producer {
  Producer {
    id: 0,
    profile_picture_url: String::new(),
    full_name: full_name.to_string(),
    bio: String::new(),
  }
}

/// A store holding one cinema, one producer and the given movies (ids assigned in order).
pub async fn seeded_store(movies: &[(&str, &str)]) -> (Arc<InMemoryStore>, Vec<Movie>) {
  let store = Arc::new(InMemoryStore::new());
  EntityStore::<Cinema>::add(store.as_ref(), cinema("Grand")).await.unwrap();
  EntityStore::<Producer>::add(store.as_ref(), producer("Ada Reel")).await.unwrap();

  let mut added = Vec::new();
  for (name, price) in movies {
    added.push(EntityStore::<Movie>::add(store.as_ref(), movie(name, price)).await.unwrap());
  }
  (store, added)
}

// --- Report test doubles ---

/// Serves canned bytes per URL; anything else is a 404.
#[derive(Default)]
pub struct StubFetcher {
  responses: HashMap<String, Vec<u8>>,
  pub requested: Mutex<Vec<String>>,
}

impl StubFetcher {
  pub fn with(mut self, url: &str, bytes: &[u8]) -> Self {
    self.responses.insert(url.to_string(), bytes.to_vec());
    self
  }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
  async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    self.requested.lock().push(url.to_string());
    self.responses.get(url).cloned().ok_or_else(|| FetchError::Status {
      url: url.to_string(),
      status: 404,
    })
  }
}

/// Captures the document instead of laying it out.
#[derive(Default)]
pub struct RecordingRenderer {
  pub documents: Mutex<Vec<ReportDocument>>,
}

impl DocumentRenderer for RecordingRenderer {
  fn render(&self, document: &ReportDocument) -> boxoffice::Result<RenderedDocument> {
    self.documents.lock().push(document.clone());
    Ok(RenderedDocument {
      bytes: b"%PDF-recorded".to_vec(),
      skipped_images: Vec::new(),
    })
  }
}

/// A renderer that cannot open its document.
pub struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
  fn render(&self, document: &ReportDocument) -> boxoffice::Result<RenderedDocument> {
    Err(BoxOfficeError::DocumentInit {
      report: document.title.clone(),
      message: "font table unavailable".to_string(),
    })
  }
}

impl RecordingRenderer {
  pub fn last(&self) -> ReportDocument {
    self.documents.lock().last().cloned().expect("renderer was called")
  }
}
