// ticketing_app/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use boxoffice::{BoxOfficeError, PipelineError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// The record was changed or removed by someone else since it was read.
  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Store Error: {source}")]
  Store {
    #[source]
    source: BoxOfficeError,
  },

  #[error("Report Error: {0}")]
  Report(String),

  #[error("Pipeline Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<BoxOfficeError> for AppError {
  fn from(err: BoxOfficeError) -> Self {
    match err {
      BoxOfficeError::NotFound { entity, id } => AppError::NotFound(format!("{} with ID {} not found.", entity, id)),
      BoxOfficeError::Concurrency { entity, id } => {
        AppError::Conflict(format!("{} with ID {} was modified or removed by another request.", entity, id))
      }
      BoxOfficeError::Validation(msg) => AppError::Validation(msg),
      invalid @ BoxOfficeError::InvalidAmount { .. } => AppError::Validation(invalid.to_string()),
      init @ BoxOfficeError::DocumentInit { .. } => AppError::Report(init.to_string()),
      BoxOfficeError::Pipeline(source) => AppError::Workflow { source },
      other => AppError::Store { source: other },
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::Config(m) => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) | AppError::Store { .. } => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
      }
      AppError::Report(m) => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"error": "Report generation failed", "detail": m}))
      }
      AppError::Workflow { source } => {
        tracing::error!(pipeline_error = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
