// ticketing_app/src/pipelines/report_pipeline.rs

//! Report generation: load the records for one report kind, then lay them
//! out through the `ReportBuilder`.

use crate::errors::AppError;
use crate::pipelines::contexts::ReportCtxData;
use boxoffice::report::{MovieListing, OrderItemListing, ReportBuilder, ReportRecord, ReportSpec};
use boxoffice::{
  Actor, Cinema, ContextData, EntityStore, Movie, OrderStore, Pipeline, PipelineControl, PipelineError, Producer,
  TicketStore,
};
use std::str::FromStr;
use tracing::info;

pub const LOAD_RECORDS: &str = "load_records";
pub const BUILD_REPORT: &str = "build_report";

/// The reports exposed under `/reports/{kind}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
  Actors,
  Producers,
  Cinemas,
  Movies,
  OrderItems,
}

impl ReportKind {
  pub fn spec(&self) -> ReportSpec {
    match self {
      ReportKind::Actors => ReportSpec::actors(),
      ReportKind::Producers => ReportSpec::producers(),
      ReportKind::Cinemas => ReportSpec::cinemas(),
      ReportKind::Movies => ReportSpec::movies(),
      ReportKind::OrderItems => ReportSpec::order_items(),
    }
  }
}

impl FromStr for ReportKind {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "actors" => Ok(ReportKind::Actors),
      "producers" => Ok(ReportKind::Producers),
      "cinemas" => Ok(ReportKind::Cinemas),
      "movies" => Ok(ReportKind::Movies),
      "order-items" => Ok(ReportKind::OrderItems),
      other => Err(AppError::NotFound(format!("No report named '{}'.", other))),
    }
  }
}

fn boxed<R: ReportRecord + 'static>(records: Vec<R>) -> Vec<Box<dyn ReportRecord>> {
  records
    .into_iter()
    .map(|r| Box::new(r) as Box<dyn ReportRecord>)
    .collect()
}

async fn load(store: &dyn TicketStore, kind: ReportKind) -> boxoffice::Result<Vec<Box<dyn ReportRecord>>> {
  Ok(match kind {
    ReportKind::Actors => boxed(EntityStore::<Actor>::list(store).await?),
    ReportKind::Producers => boxed(EntityStore::<Producer>::list(store).await?),
    ReportKind::Cinemas => boxed(EntityStore::<Cinema>::list(store).await?),
    ReportKind::Movies => {
      let movies = EntityStore::<Movie>::list(store).await?;
      let cinemas = EntityStore::<Cinema>::list(store).await?;
      let producers = EntityStore::<Producer>::list(store).await?;
      boxed(MovieListing::join(movies, &cinemas, &producers))
    }
    ReportKind::OrderItems => {
      let lines = store.list_order_lines().await?;
      let movies = EntityStore::<Movie>::list(store).await?;
      let orders = store.list_orders().await?;
      boxed(OrderItemListing::join(lines, &movies, &orders))
    }
  })
}

pub fn build_report_pipeline() -> Result<Pipeline<ReportCtxData, AppError>, PipelineError> {
  let mut p = Pipeline::<ReportCtxData, AppError>::new("report", &[(LOAD_RECORDS, false), (BUILD_REPORT, false)]);

  p.on_root(LOAD_RECORDS, |ctx_data: ContextData<ReportCtxData>| {
    Box::pin(async move {
      let (store, kind) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.kind)
      };
      let records = load(store.as_ref(), kind).await?;
      info!(report = ?kind, records = records.len(), "Report records loaded.");
      ctx_data.write().records = records;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on_root(BUILD_REPORT, |ctx_data: ContextData<ReportCtxData>| {
    Box::pin(async move {
      let (state, spec, records) = {
        let mut guard = ctx_data.write();
        let records = std::mem::take(&mut guard.records);
        (guard.app_state.clone(), guard.kind.spec(), records)
      };

      let builder = ReportBuilder::new(state.fetcher.as_ref(), state.renderer.as_ref());
      let output = builder.build(&spec, &records).await?;
      ctx_data.write().output = Some(output);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  Ok(p)
}
