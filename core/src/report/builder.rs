// core/src/report/builder.rs

//! Assembles report documents from store records.

use super::fetch::ImageFetcher;
use super::record::{ReportRecord, NOT_AVAILABLE};
use super::render::{DocumentRenderer, ReportCell, ReportDocument, ReportRow, PDF_CONTENT_TYPE};
use super::spec::{ColumnKind, ColumnSpec, ReportSpec};
use crate::error::{ImageFetchError, Result};
use tracing::{info, instrument, warn};

/// A non-fatal, row-level failure recorded while building a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDiagnostic {
  /// 1-based data row number (the header row is not counted).
  pub row: usize,
  pub record_id: i64,
  pub column: String,
  pub error: ImageFetchError,
}

/// A finished document plus whatever went wrong along the way.
#[derive(Debug, Clone)]
pub struct ReportOutput {
  pub file_name: String,
  pub content_type: &'static str,
  pub bytes: Vec<u8>,
  pub row_count: usize,
  pub diagnostics: Vec<ReportDiagnostic>,
}

pub struct ReportBuilder<'a> {
  fetcher: &'a dyn ImageFetcher,
  renderer: &'a dyn DocumentRenderer,
}

impl<'a> ReportBuilder<'a> {
  pub fn new(fetcher: &'a dyn ImageFetcher, renderer: &'a dyn DocumentRenderer) -> Self {
    Self { fetcher, renderer }
  }

  /// Lays out `records` in input order under `spec`'s header row.
  ///
  /// Image cells that cannot be fetched or decoded are left blank and
  /// reported in `ReportOutput::diagnostics`; only a renderer failure aborts.
  #[instrument(name = "ReportBuilder::build", skip(self, spec, records), fields(report = spec.name, records = records.len()))]
  pub async fn build<R: ReportRecord>(&self, spec: &ReportSpec, records: &[R]) -> Result<ReportOutput> {
    let (document, mut diagnostics) = self.assemble(spec, records).await;

    let rendered = self.renderer.render(&document)?;
    for skipped in rendered.skipped_images {
      let (Some(row), Some(column)) = (document.rows.get(skipped.row), spec.columns.get(skipped.column)) else {
        continue;
      };
      diagnostics.push(ReportDiagnostic {
        row: skipped.row + 1,
        record_id: row.record_id,
        column: column.header.to_string(),
        error: ImageFetchError::Undecodable(skipped.reason),
      });
    }
    diagnostics.sort_by_key(|d| d.row);

    if !diagnostics.is_empty() {
      warn!(failures = diagnostics.len(), "Report produced with blank image cells.");
    }
    info!(bytes = rendered.bytes.len(), "Report document rendered.");

    Ok(ReportOutput {
      file_name: spec.file_name(),
      content_type: PDF_CONTENT_TYPE,
      bytes: rendered.bytes,
      row_count: document.rows.len(),
      diagnostics,
    })
  }

  /// Builds the in-memory table, fetching images one row at a time.
  pub async fn assemble<R: ReportRecord>(
    &self,
    spec: &ReportSpec,
    records: &[R],
  ) -> (ReportDocument, Vec<ReportDiagnostic>) {
    let mut diagnostics = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
      let mut cells = Vec::with_capacity(spec.columns.len());
      for column in &spec.columns {
        let cell = match column.kind {
          ColumnKind::Image => match self.fetch_image(record, column).await {
            Ok(bytes) => ReportCell::Image(Some(bytes)),
            Err(error) => {
              warn!(record_id = record.record_id(), column = column.header, %error, "Image fetch failed; leaving cell blank.");
              diagnostics.push(ReportDiagnostic {
                row: idx + 1,
                record_id: record.record_id(),
                column: column.header.to_string(),
                error,
              });
              ReportCell::Image(None)
            }
          },
          _ => ReportCell::Text(render_text(record, column)),
        };
        cells.push(cell);
      }
      rows.push(ReportRow {
        record_id: record.record_id(),
        cells,
      });
    }

    let document = ReportDocument {
      title: spec.title.to_string(),
      headers: spec.columns.iter().map(|c| c.header.to_string()).collect(),
      rows,
    };
    (document, diagnostics)
  }

  async fn fetch_image<R: ReportRecord>(&self, record: &R, column: &ColumnSpec) -> std::result::Result<Vec<u8>, ImageFetchError> {
    let value = record.field(column.field).ok_or(ImageFetchError::MissingUrl)?;
    let url = value.as_url().ok_or(ImageFetchError::MissingUrl)?;
    Ok(self.fetcher.get_bytes(url).await?)
  }
}

fn render_text<R: ReportRecord>(record: &R, column: &ColumnSpec) -> String {
  let text = record.field(column.field).map(|v| v.render()).unwrap_or_default();
  if column.kind == ColumnKind::Relation && text.trim().is_empty() {
    NOT_AVAILABLE.to_string()
  } else {
    text
  }
}
