// ticketing_app/src/web/handlers/report_handlers.rs

use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};
use boxoffice::report::ReportOutput;
use boxoffice::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::ReportCtxData;
use crate::pipelines::report_pipeline::ReportKind;
use crate::state::AppState;

pub const IMAGE_FAILURES_HEADER: &str = "X-Report-Image-Failures";

/// A finished document as a file download.
pub fn document_response(output: ReportOutput) -> HttpResponse {
  HttpResponse::Ok()
    .content_type(output.content_type)
    .insert_header(ContentDisposition::attachment(output.file_name))
    .insert_header((IMAGE_FAILURES_HEADER, output.diagnostics.len().to_string()))
    .body(output.bytes)
}

#[instrument(name = "handler::report", skip(app_state, path), fields(report = %path.as_str()))]
pub async fn report_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let kind = path.parse::<ReportKind>()?;
  let ctx = ContextData::new(ReportCtxData::new(app_state.get_ref().clone(), kind));

  match app_state.pipelines.report.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let output = ctx.write().output.take().ok_or_else(|| {
        warn!("Report pipeline completed without producing a document.");
        AppError::Internal("Report generation produced no document.".to_string())
      })?;

      for diagnostic in &output.diagnostics {
        warn!(
          row = diagnostic.row,
          record_id = diagnostic.record_id,
          column = %diagnostic.column,
          error = %diagnostic.error,
          "Report image left blank."
        );
      }
      info!(rows = output.row_count, bytes = output.bytes.len(), "Report served.");
      Ok(document_response(output))
    }
    PipelineResult::Stopped => Err(AppError::Internal("Report generation was halted.".to_string())),
  }
}
