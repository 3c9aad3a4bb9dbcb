// core/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A completed purchase. Immutable once the store hands it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
  pub id: i64,
  pub user_id: String,
  pub user_email: String,
  pub created_at: DateTime<Utc>,
  pub lines: Vec<OrderLine>,
}

impl Order {
  /// Σ(unit price at purchase × quantity), at full precision.
  pub fn total(&self) -> Decimal {
    self.lines.iter().map(OrderLine::line_total).sum()
  }

  pub fn ticket_count(&self) -> u32 {
    self.lines.iter().map(|l| l.quantity).sum()
  }
}

/// One purchased movie inside an order (an `order_items` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
  pub id: i64,
  /// `None` when the owning order row is gone (legacy rows in reports).
  pub order_id: Option<i64>,
  pub movie_id: Option<i64>,
  pub quantity: u32,
  #[serde(with = "rust_decimal::serde::str")]
  pub unit_price_at_purchase: Decimal,
}

impl OrderLine {
  pub fn line_total(&self) -> Decimal {
    self.unit_price_at_purchase * Decimal::from(self.quantity)
  }
}

/// Draft handed to `OrderStore::store_order`; the store assigns ids and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub user_id: String,
  pub user_email: String,
  pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
  pub movie_id: i64,
  pub quantity: u32,
  pub unit_price_at_purchase: Decimal,
}
