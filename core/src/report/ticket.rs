// core/src/report/ticket.rs

//! The single-order "Movie Ticket" document handed out after checkout.

use super::render::{DocumentRenderer, ReportCell, ReportDocument, ReportRow, PDF_CONTENT_TYPE};
use super::ReportOutput;
use crate::error::Result;
use crate::models::{Movie, Order};
use crate::money::format_currency;
use serde::Serialize;
use std::collections::HashMap;

pub const TICKET_FILE_NAME: &str = "OrderDetails.pdf";

/// What the confirmation page and the ticket PDF show for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
  pub order_id: i64,
  pub user_name: String,
  /// Comma-separated names of the purchased movies.
  pub movie_names: String,
  /// Price of the first line, as the confirmation page shows it.
  pub ticket_price: Option<String>,
  pub number_of_tickets: u32,
  pub total: String,
}

impl TicketSummary {
  /// `movies` resolves line movie ids to names; unknown ids are skipped.
  pub fn from_order(order: &Order, user_name: &str, movies: &[Movie]) -> Self {
    let names: HashMap<i64, &str> = movies.iter().map(|m| (m.id, m.name.as_str())).collect();
    let movie_names = order
      .lines
      .iter()
      .filter_map(|l| l.movie_id.and_then(|id| names.get(&id).copied()))
      .collect::<Vec<_>>()
      .join(", ");

    Self {
      order_id: order.id,
      user_name: user_name.to_string(),
      movie_names,
      ticket_price: order.lines.first().map(|l| format_currency(l.unit_price_at_purchase)),
      number_of_tickets: order.ticket_count(),
      total: format_currency(order.total()),
    }
  }

  pub fn document(&self) -> ReportDocument {
    let pairs = [
      ("User Name:", self.user_name.clone()),
      ("Movie:", self.movie_names.clone()),
      ("Ticket Price:", self.ticket_price.clone().unwrap_or_default()),
      ("Number of Tickets:", self.number_of_tickets.to_string()),
      ("Total:", self.total.clone()),
    ];

    ReportDocument {
      title: "Movie Ticket".to_string(),
      headers: Vec::new(),
      rows: pairs
        .into_iter()
        .map(|(label, value)| ReportRow {
          record_id: self.order_id,
          cells: vec![ReportCell::Text(label.to_string()), ReportCell::Text(value)],
        })
        .collect(),
    }
  }

  pub fn render(&self, renderer: &dyn DocumentRenderer) -> Result<ReportOutput> {
    let document = self.document();
    let rendered = renderer.render(&document)?;
    Ok(ReportOutput {
      file_name: TICKET_FILE_NAME.to_string(),
      content_type: PDF_CONTENT_TYPE,
      bytes: rendered.bytes,
      row_count: document.rows.len(),
      diagnostics: Vec::new(),
    })
  }
}
