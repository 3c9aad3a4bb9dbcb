// ticketing_app/src/services/cart_sessions.rs

//! Per-session carts, keyed by the caller-supplied session id.
//!
//! A session only occupies memory while its cart holds tickets: reads never
//! create an entry, and an entry is dropped as soon as its cart is empty.

use boxoffice::{Cart, ContextData};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Each session gets its own `ContextData<Cart>`, so two sessions never
/// contend on the same cart lock. Cart mutations run while the outer map is
/// locked and entries are only removed under its write lock, so an update
/// never lands in a cart that was just dropped from the map.
#[derive(Clone, Default)]
pub struct CartSessions {
  sessions: ContextData<HashMap<String, ContextData<Cart>>>,
  in_checkout: ContextData<HashSet<String>>,
}

/// Marks a session as checking out until dropped.
pub struct CheckoutLease {
  in_checkout: ContextData<HashSet<String>>,
  session_id: String,
}

impl Drop for CheckoutLease {
  fn drop(&mut self) {
    self.in_checkout.write().remove(&self.session_id);
  }
}

impl CartSessions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reads the session's cart without creating one.
  pub fn read<R>(&self, session_id: &str, f: impl FnOnce(&Cart) -> R) -> Option<R> {
    let sessions = self.sessions.read();
    sessions.get(session_id).map(|cart| f(&cart.read()))
  }

  /// A copy of the session's cart; empty when the session has none.
  pub fn snapshot(&self, session_id: &str) -> Cart {
    self.read(session_id, Cart::clone).unwrap_or_default()
  }

  /// Mutates the session's cart, opening one if needed.
  pub fn update<R>(&self, session_id: &str, f: impl FnOnce(&mut Cart) -> R) -> R {
    let (result, now_empty) = {
      let mut sessions = self.sessions.write();
      let cart = sessions.entry(session_id.to_string()).or_insert_with(|| {
        debug!(session_id, "Opening a new cart session.");
        ContextData::new(Cart::new())
      });
      cart.update(|c| (f(c), c.is_empty()))
    };
    if now_empty {
      self.release_if_empty(session_id);
    }
    result
  }

  /// Mutates the session's cart only if the session exists.
  pub fn update_existing<R>(&self, session_id: &str, f: impl FnOnce(&mut Cart) -> R) -> Option<R> {
    let (result, now_empty) = {
      let sessions = self.sessions.read();
      let cart = sessions.get(session_id)?;
      cart.update(|c| (f(c), c.is_empty()))
    };
    if now_empty {
      self.release_if_empty(session_id);
    }
    Some(result)
  }

  /// Drops the session entry when its cart holds no tickets.
  pub fn release_if_empty(&self, session_id: &str) {
    let mut sessions = self.sessions.write();
    if sessions.get(session_id).is_some_and(|cart| cart.read().is_empty()) {
      sessions.remove(session_id);
      debug!(session_id, "Closed empty cart session.");
    }
  }

  /// Claims the session for one checkout. `None` while another checkout on
  /// the same session is still running.
  pub fn begin_checkout(&self, session_id: &str) -> Option<CheckoutLease> {
    if !self.in_checkout.write().insert(session_id.to_string()) {
      return None;
    }
    Some(CheckoutLease {
      in_checkout: self.in_checkout.clone(),
      session_id: session_id.to_string(),
    })
  }

  pub fn session_count(&self) -> usize {
    self.sessions.read().len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use boxoffice::{Movie, MovieCategory};
  use chrono::Utc;
  use rust_decimal::Decimal;

  fn movie(id: i64) -> Movie {
    Movie {
      id,
      name: format!("Movie {}", id),
      description: String::new(),
      price: Decimal::TEN,
      image_url: String::new(),
      start_date: Utc::now(),
      end_date: Utc::now(),
      category: MovieCategory::Drama,
      cinema_id: 1,
      producer_id: 1,
    }
  }

  #[test]
  fn test_sessions_are_isolated() {
    let sessions = CartSessions::new();
    sessions.update("a", |c| c.add_item(Some(&movie(1))));
    sessions.update("b", |c| c.add_item(Some(&movie(2))));
    sessions.update("a", |c| c.add_item(Some(&movie(1))));

    assert_eq!(sessions.read("a", Cart::ticket_count), Some(2));
    assert_eq!(sessions.read("b", Cart::ticket_count), Some(1));
    assert_eq!(sessions.session_count(), 2);
  }

  #[test]
  fn test_reads_and_no_op_updates_do_not_open_sessions() {
    let sessions = CartSessions::new();

    assert!(sessions.read("ghost", Cart::ticket_count).is_none());
    assert!(sessions.snapshot("ghost").is_empty());
    sessions.update("ghost", |c| c.add_item(None));
    assert!(sessions.update_existing("ghost", |c| c.remove_item(1)).is_none());

    assert_eq!(sessions.session_count(), 0);
  }

  #[test]
  fn test_emptied_cart_closes_its_session() {
    let sessions = CartSessions::new();
    sessions.update("a", |c| c.add_item(Some(&movie(1))));
    assert_eq!(sessions.session_count(), 1);

    sessions.update_existing("a", |c| c.remove_item(1));
    assert_eq!(sessions.session_count(), 0);
  }

  #[test]
  fn test_one_checkout_per_session() {
    let sessions = CartSessions::new();
    let lease = sessions.begin_checkout("a");
    assert!(lease.is_some());
    assert!(sessions.begin_checkout("a").is_none());
    assert!(sessions.begin_checkout("b").is_some());

    drop(lease);
    assert!(sessions.begin_checkout("a").is_some());
  }
}
