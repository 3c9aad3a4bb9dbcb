// core/src/report/mod.rs

//! On-demand tabular reports.
//!
//! A [`ReportSpec`] names the columns; [`ReportBuilder`] walks the records in
//! the order given, fetches image cells through an [`ImageFetcher`] one row
//! at a time, and hands the finished [`ReportDocument`] to a
//! [`DocumentRenderer`]. Image failures never abort a report; they blank the
//! cell and are listed in [`ReportOutput::diagnostics`].

pub mod builder;
pub mod fetch;
pub mod record;
pub mod render;
pub mod spec;
pub mod ticket;

pub use builder::{ReportBuilder, ReportDiagnostic, ReportOutput};
pub use fetch::{ImageFetcher, NoopFetcher};
pub use record::{FieldValue, MovieListing, OrderItemListing, ReportRecord, NOT_AVAILABLE};
pub use render::{
  DocumentRenderer, PdfRenderer, RenderedDocument, ReportCell, ReportDocument, ReportRow, SkippedImage,
  PDF_CONTENT_TYPE,
};
pub use spec::{ColumnKind, ColumnSpec, ReportSpec};
pub use ticket::{TicketSummary, TICKET_FILE_NAME};
