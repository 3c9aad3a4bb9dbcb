// ticketing_app/src/pipelines/mod.rs

//! Pipelines used by the HTTP handlers. Built once at startup and shared
//! through `AppState`.

use crate::errors::AppError;
use boxoffice::{Pipeline, PipelineError};

pub mod checkout_pipeline;
pub mod contexts;
pub mod report_pipeline;

use contexts::{CheckoutCtxData, ReportCtxData};

pub struct Pipelines {
  pub checkout: Pipeline<CheckoutCtxData, AppError>,
  pub report: Pipeline<ReportCtxData, AppError>,
}

impl Pipelines {
  pub fn build() -> Result<Self, PipelineError> {
    tracing::info!("Building application pipelines...");
    let pipelines = Self {
      checkout: checkout_pipeline::build_checkout_pipeline()?,
      report: report_pipeline::build_report_pipeline()?,
    };
    tracing::info!(
      checkout_steps = ?pipelines.checkout.step_names(),
      report_steps = ?pipelines.report.step_names(),
      "Pipelines ready."
    );
    Ok(pipelines)
  }
}
