// core/src/cart.rs

//! The session cart: movies picked for purchase and how many tickets of each.

use crate::models::Movie;
use crate::money::format_currency;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
  pub movie_id: i64,
  pub movie_name: String,
  /// Catalog price as of the last [`Cart::reprice`]. Checkout re-reads the live price.
  #[serde(with = "rust_decimal::serde::str")]
  pub unit_price: Decimal,
  /// Always ≥ 1 while the item is in the cart.
  pub quantity: u32,
}

impl CartItem {
  pub fn line_total(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }
}

/// Ordered collection of [`CartItem`]s, unique by movie id.
///
/// The caller owns session keying; a `Cart` is just a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
  items: Vec<CartItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one ticket for `movie`. Unknown movies (`None`) are ignored.
  pub fn add_item(&mut self, movie: Option<&Movie>) {
    let Some(movie) = movie else {
      debug!("Ignoring add of an unknown movie.");
      return;
    };

    match self.items.iter_mut().find(|i| i.movie_id == movie.id) {
      Some(existing) => existing.quantity += 1,
      None => self.items.push(CartItem {
        movie_id: movie.id,
        movie_name: movie.name.clone(),
        unit_price: movie.price,
        quantity: 1,
      }),
    }
  }

  /// Removes one ticket for `movie_id`, dropping the item when none remain.
  /// Removing a movie that is not carted leaves the cart untouched.
  pub fn remove_item(&mut self, movie_id: i64) {
    let Some(idx) = self.items.iter().position(|i| i.movie_id == movie_id) else {
      return;
    };

    if self.items[idx].quantity > 1 {
      self.items[idx].quantity -= 1;
    } else {
      self.items.remove(idx);
    }
  }

  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  /// Σ(unit price × quantity) at full precision.
  pub fn total(&self) -> Decimal {
    self.items.iter().map(CartItem::line_total).sum()
  }

  pub fn total_display(&self) -> String {
    format_currency(self.total())
  }

  pub fn ticket_count(&self) -> u32 {
    self.items.iter().map(|i| i.quantity).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Empties the cart.
  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Refreshes name and unit price from the catalog. Items whose movie is not
  /// in `movies` keep what they had.
  pub fn reprice(&mut self, movies: &[Movie]) {
    for item in &mut self.items {
      if let Some(movie) = movies.iter().find(|m| m.id == item.movie_id) {
        item.movie_name.clone_from(&movie.name);
        item.unit_price = movie.price;
      }
    }
  }

  /// Takes the tickets of a persisted order out of the cart. Tickets added
  /// after `ordered` was snapshotted stay behind.
  pub fn settle(&mut self, ordered: &Cart) {
    for paid in &ordered.items {
      if let Some(idx) = self.items.iter().position(|i| i.movie_id == paid.movie_id) {
        if self.items[idx].quantity > paid.quantity {
          self.items[idx].quantity -= paid.quantity;
        } else {
          self.items.remove(idx);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::MovieCategory;
  use chrono::Utc;

  fn movie(id: i64, price: Decimal) -> Movie {
    Movie {
      id,
      name: format!("Movie {}", id),
      description: String::new(),
      price,
      image_url: String::new(),
      start_date: Utc::now(),
      end_date: Utc::now(),
      category: MovieCategory::Drama,
      cinema_id: 1,
      producer_id: 1,
    }
  }

  #[test]
  fn adding_same_movie_increments_quantity() {
    let a = movie(1, Decimal::new(10, 0));
    let mut cart = Cart::new();
    cart.add_item(Some(&a));
    cart.add_item(Some(&a));

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(cart.total(), Decimal::new(20, 0));
  }

  #[test]
  fn adding_unknown_movie_is_a_no_op() {
    let mut cart = Cart::new();
    cart.add_item(None);
    assert!(cart.is_empty());
  }

  #[test]
  fn removing_last_ticket_drops_the_item() {
    let a = movie(1, Decimal::new(10, 0));
    let b = movie(2, Decimal::new(15, 0));
    let mut cart = Cart::new();
    cart.add_item(Some(&a));
    cart.add_item(Some(&b));
    cart.add_item(Some(&a));

    cart.remove_item(1);
    assert_eq!(cart.items()[0].quantity, 1);
    cart.remove_item(1);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].movie_id, 2);
  }

  #[test]
  fn removing_absent_item_leaves_cart_unchanged() {
    let a = movie(1, Decimal::new(10, 0));
    let mut cart = Cart::new();
    cart.add_item(Some(&a));
    let before = cart.clone();

    cart.remove_item(42);
    assert_eq!(cart, before);
  }

  #[test]
  fn items_keep_insertion_order() {
    let mut cart = Cart::new();
    for id in [3, 1, 2] {
      cart.add_item(Some(&movie(id, Decimal::ONE)));
    }
    let ids: Vec<i64> = cart.items().iter().map(|i| i.movie_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
  }

  #[test]
  fn total_keeps_precision_until_display() {
    let mut cart = Cart::new();
    let odd = movie(1, Decimal::new(3333, 3)); // 3.333
    cart.add_item(Some(&odd));
    cart.add_item(Some(&odd));
    cart.add_item(Some(&odd));

    assert_eq!(cart.total(), Decimal::new(9999, 3));
    assert_eq!(cart.total_display(), "10.00");
  }

  #[test]
  fn reprice_follows_catalog_changes() {
    let mut cart = Cart::new();
    cart.add_item(Some(&movie(1, Decimal::new(10, 0))));
    cart.add_item(Some(&movie(2, Decimal::new(5, 0))));

    let mut dearer = movie(1, Decimal::new(20, 0));
    dearer.name = "Movie 1 (IMAX)".to_string();
    cart.reprice(&[dearer]);

    assert_eq!(cart.items()[0].unit_price, Decimal::new(20, 0));
    assert_eq!(cart.items()[0].movie_name, "Movie 1 (IMAX)");
    assert_eq!(cart.items()[1].unit_price, Decimal::new(5, 0));
    assert_eq!(cart.total(), Decimal::new(25, 0));
  }

  #[test]
  fn settle_keeps_tickets_added_after_snapshot() {
    let a = movie(1, Decimal::new(10, 0));
    let b = movie(2, Decimal::new(15, 0));
    let mut cart = Cart::new();
    cart.add_item(Some(&a));
    cart.add_item(Some(&a));
    let ordered = cart.clone();

    cart.add_item(Some(&a));
    cart.add_item(Some(&b));
    cart.settle(&ordered);

    assert_eq!(cart.ticket_count(), 2);
    assert_eq!(cart.items()[0].movie_id, 1);
    assert_eq!(cart.items()[0].quantity, 1);
    assert_eq!(cart.items()[1].movie_id, 2);

    cart.settle(&cart.clone());
    assert!(cart.is_empty());
  }
}
