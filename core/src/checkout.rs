// core/src/checkout.rs

//! Turns a cart into a persisted order.

use crate::cart::Cart;
use crate::error::{BoxOfficeError, Result};
use crate::models::{Movie, NewOrder, NewOrderLine, Order};
use crate::store::{EntityStore, OrderStore, TicketStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Builds and persists orders from carts.
///
/// The cart is borrowed immutably: clearing it is the caller's step, taken
/// only once `finalize` has returned the persisted order.
#[derive(Clone)]
pub struct OrderFinalizer {
  store: Arc<dyn TicketStore>,
}

impl OrderFinalizer {
  pub fn new(store: Arc<dyn TicketStore>) -> Self {
    Self { store }
  }

  /// Snapshots each carted movie's current price and writes one order with
  /// one line per cart item.
  ///
  /// Fails with `Validation` for an empty cart, `NotFound` when a carted
  /// movie has been removed from the catalog, and `Persistence` when the
  /// store rejects the write. Nothing is written on failure.
  #[instrument(name = "OrderFinalizer::finalize", skip(self, cart, user_email), fields(items = cart.items().len()))]
  pub async fn finalize(&self, cart: &Cart, user_id: &str, user_email: &str) -> Result<Order> {
    if cart.is_empty() {
      return Err(BoxOfficeError::Validation("Cannot complete an order from an empty cart.".to_string()));
    }
    if user_id.trim().is_empty() {
      return Err(BoxOfficeError::Validation("An order requires a user id.".to_string()));
    }

    let mut lines = Vec::with_capacity(cart.items().len());
    for item in cart.items() {
      let live: Option<Movie> = EntityStore::<Movie>::find(self.store.as_ref(), item.movie_id).await?;
      let movie = live.ok_or_else(|| {
        warn!(movie_id = item.movie_id, "Carted movie no longer exists.");
        BoxOfficeError::NotFound {
          entity: "Movie",
          id: item.movie_id,
        }
      })?;

      if movie.price != item.unit_price {
        info!(
          movie_id = movie.id,
          carted = %item.unit_price,
          current = %movie.price,
          "Movie price changed since it was carted; using current price."
        );
      }

      lines.push(NewOrderLine {
        movie_id: movie.id,
        quantity: item.quantity,
        unit_price_at_purchase: movie.price,
      });
    }

    let draft = NewOrder {
      user_id: user_id.to_string(),
      user_email: user_email.to_string(),
      lines,
    };

    let order = self.store.store_order(draft).await?;
    info!(order_id = order.id, total = %order.total(), "Order persisted.");
    Ok(order)
  }
}
