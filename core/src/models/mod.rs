// core/src/models/mod.rs

//! Records persisted by the entity store.

pub mod cinema;
pub mod movie;
pub mod order;
pub mod person;
pub mod user;

pub use cinema::Cinema;
pub use movie::{Movie, MovieCategory};
pub use order::{NewOrder, NewOrderLine, Order, OrderLine};
pub use person::{Actor, Producer};
pub use user::UserRole;

/// Common surface of catalog records managed through `EntityStore<T>`.
///
/// Ids are assigned by the store on `add`; a record that has not been
/// persisted yet carries id `0`.
pub trait Entity: Clone + Send + Sync + 'static {
  /// Singular name used in errors and logs.
  const KIND: &'static str;

  fn id(&self) -> i64;

  fn set_id(&mut self, id: i64);
}
