// ticketing_app/src/pipelines/contexts.rs

//! Data carried through each pipeline. Handlers receive these wrapped in
//! `boxoffice::ContextData`.

use crate::pipelines::report_pipeline::ReportKind;
use crate::state::AppState;
use boxoffice::report::{ReportOutput, ReportRecord, TicketSummary};
use boxoffice::{Cart, Order};

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  /// Key of the live cart in `AppState::carts`.
  pub session_id: String,
  pub user_id: String,
  pub user_email: String,
  /// The cart contents the order was built from.
  pub ordered: Option<Cart>,
  pub order: Option<Order>,
  pub cart_cleared: bool,
  pub confirmation: Option<TicketSummary>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, session_id: String, user_id: String, user_email: String) -> Self {
    Self {
      app_state,
      session_id,
      user_id,
      user_email,
      ordered: None,
      order: None,
      cart_cleared: false,
      confirmation: None,
    }
  }
}

pub struct ReportCtxData {
  pub app_state: AppState,
  pub kind: ReportKind,
  pub records: Vec<Box<dyn ReportRecord>>,
  pub output: Option<ReportOutput>,
}

impl ReportCtxData {
  pub fn new(app_state: AppState, kind: ReportKind) -> Self {
    Self {
      app_state,
      kind,
      records: Vec::new(),
      output: None,
    }
  }
}
