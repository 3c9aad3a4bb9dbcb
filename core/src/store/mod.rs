// core/src/store/mod.rs

//! The entity store seam. Persistence is owned by the backend; components
//! only see these traits through an explicitly passed handle.

pub mod in_memory;

use crate::error::Result;
use crate::models::{Actor, Cinema, Entity, Movie, NewOrder, Order, OrderLine, Producer, UserRole};
use async_trait::async_trait;

pub use in_memory::InMemoryStore;

/// CRUD over one catalog entity type.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
  async fn find(&self, id: i64) -> Result<Option<T>>;

  async fn list(&self) -> Result<Vec<T>>;

  /// Persists a new record and returns it with its assigned id.
  async fn add(&self, record: T) -> Result<T>;

  /// Fails with `BoxOfficeError::Concurrency` when the stored row is gone.
  async fn update(&self, record: T) -> Result<T>;

  /// Returns whether a row was removed. Removing an absent id is not an error.
  async fn remove(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Writes the order and all its lines as one atomic operation.
  async fn store_order(&self, order: NewOrder) -> Result<Order>;

  async fn find_order(&self, id: i64) -> Result<Option<Order>>;

  async fn list_orders(&self) -> Result<Vec<Order>>;

  /// Orders placed by `user_id`, or every order when `role` is admin.
  async fn orders_for_user(&self, user_id: &str, role: UserRole) -> Result<Vec<Order>>;

  /// Every order line, including ones whose order or movie has since been removed.
  async fn list_order_lines(&self) -> Result<Vec<OrderLine>>;
}

/// Everything the box office needs from persistence, as one object-safe handle.
pub trait TicketStore:
  EntityStore<Actor> + EntityStore<Producer> + EntityStore<Cinema> + EntityStore<Movie> + OrderStore
{
}

impl<S> TicketStore for S where
  S: EntityStore<Actor> + EntityStore<Producer> + EntityStore<Cinema> + EntityStore<Movie> + OrderStore
{
}
