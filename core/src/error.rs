// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors raised by the pipeline engine itself (as opposed to its handlers).
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },
}

/// Domain errors surfaced by the cart, checkout, store and report components.
#[derive(Debug, Error)]
pub enum BoxOfficeError {
  #[error("{entity} with id {id} not found")]
  NotFound { entity: &'static str, id: i64 },

  #[error("Persistence failure: {source}")]
  Persistence {
    #[source]
    source: AnyhowError,
  },

  /// The record was modified or removed since it was read.
  #[error("Concurrency conflict: {entity} {id} is stale or no longer exists")]
  Concurrency { entity: &'static str, id: i64 },

  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Invalid currency amount '{input}': {reason}")]
  InvalidAmount { input: String, reason: String },

  /// Fatal for a report build; no partial document is returned.
  #[error("Failed to initialize document '{report}': {message}")]
  DocumentInit { report: String, message: String },

  #[error("Pipeline error: {0}")]
  Pipeline(#[from] PipelineError),
}

impl BoxOfficeError {
  /// Wraps any backend error as a persistence failure.
  pub fn persistence<E>(err: E) -> Self
  where
    E: Into<AnyhowError>,
  {
    BoxOfficeError::Persistence { source: err.into() }
  }
}

impl From<AnyhowError> for BoxOfficeError {
  fn from(err: AnyhowError) -> Self {
    // Stores bubble up opaque anyhow errors; anything else is already typed.
    BoxOfficeError::Persistence { source: err }
  }
}

/// Failure of the HTTP fetch collaborator for a single URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
  #[error("Invalid image URL '{0}'")]
  InvalidUrl(String),

  #[error("Request to '{url}' returned status {status}")]
  Status { url: String, status: u16 },

  #[error("Request to '{0}' timed out")]
  Timeout(String),

  #[error("Request to '{url}' failed: {message}")]
  Transport { url: String, message: String },
}

/// Per-row image failure recorded in report diagnostics. Never fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageFetchError {
  #[error("No image URL present")]
  MissingUrl,

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error("Fetched bytes are not a supported image: {0}")]
  Undecodable(String),
}

pub type Result<T, E = BoxOfficeError> = std::result::Result<T, E>;
