// core/src/store/in_memory.rs

//! In-process store used by tests and the `memory` backend.

use super::{EntityStore, OrderStore};
use crate::error::{BoxOfficeError, Result};
use crate::models::{Actor, Cinema, Entity, Movie, NewOrder, Order, OrderLine, Producer, UserRole};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
struct Table<T> {
  rows: BTreeMap<i64, T>,
  next_id: i64,
}

impl<T> Default for Table<T> {
  fn default() -> Self {
    Self {
      rows: BTreeMap::new(),
      next_id: 1,
    }
  }
}

impl<T> Table<T> {
  fn allocate_id(&mut self) -> i64 {
    let id = self.next_id;
    self.next_id += 1;
    id
  }
}

#[derive(Debug, Default)]
struct OrderTables {
  orders: Table<Order>,
  // Lines are kept separately so reports can see lines whose order was removed.
  lines: Table<OrderLine>,
}

/// Tables are individually locked; every operation takes its lock once and
/// releases it before returning, so nothing is held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  actors: RwLock<Table<Actor>>,
  producers: RwLock<Table<Producer>>,
  cinemas: RwLock<Table<Cinema>>,
  movies: RwLock<Table<Movie>>,
  orders: RwLock<OrderTables>,
  fail_next_order_write: AtomicBool,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes the next `store_order` call fail with a persistence error, leaving
  /// no trace of the order. Lets callers exercise the checkout failure path.
  pub fn fail_next_order_write(&self) {
    self.fail_next_order_write.store(true, Ordering::SeqCst);
  }

  /// Inserts a line without an owning order, as legacy data may contain.
  pub fn insert_orphan_line(&self, movie_id: Option<i64>, quantity: u32, price: rust_decimal::Decimal) -> OrderLine {
    let mut tables = self.orders.write();
    let line = OrderLine {
      id: tables.lines.allocate_id(),
      order_id: None,
      movie_id,
      quantity,
      unit_price_at_purchase: price,
    };
    tables.lines.rows.insert(line.id, line.clone());
    line
  }

  fn assemble(order: &Order, lines: &Table<OrderLine>) -> Order {
    let mut assembled = order.clone();
    assembled.lines = lines
      .rows
      .values()
      .filter(|l| l.order_id == Some(order.id))
      .cloned()
      .collect();
    assembled
  }
}

trait HasTable<T> {
  fn table(&self) -> &RwLock<Table<T>>;
}

impl HasTable<Actor> for InMemoryStore {
  fn table(&self) -> &RwLock<Table<Actor>> {
    &self.actors
  }
}

impl HasTable<Producer> for InMemoryStore {
  fn table(&self) -> &RwLock<Table<Producer>> {
    &self.producers
  }
}

impl HasTable<Cinema> for InMemoryStore {
  fn table(&self) -> &RwLock<Table<Cinema>> {
    &self.cinemas
  }
}

impl HasTable<Movie> for InMemoryStore {
  fn table(&self) -> &RwLock<Table<Movie>> {
    &self.movies
  }
}

#[async_trait]
impl<T> EntityStore<T> for InMemoryStore
where
  T: Entity,
  InMemoryStore: HasTable<T>,
{
  async fn find(&self, id: i64) -> Result<Option<T>> {
    Ok(self.table().read().rows.get(&id).cloned())
  }

  async fn list(&self) -> Result<Vec<T>> {
    Ok(self.table().read().rows.values().cloned().collect())
  }

  async fn add(&self, mut record: T) -> Result<T> {
    let mut table = self.table().write();
    let id = table.allocate_id();
    record.set_id(id);
    table.rows.insert(id, record.clone());
    tracing::debug!(entity = T::KIND, id, "Record added.");
    Ok(record)
  }

  async fn update(&self, record: T) -> Result<T> {
    let mut table = self.table().write();
    match table.rows.get_mut(&record.id()) {
      Some(existing) => {
        *existing = record.clone();
        Ok(record)
      }
      None => Err(BoxOfficeError::Concurrency {
        entity: T::KIND,
        id: record.id(),
      }),
    }
  }

  async fn remove(&self, id: i64) -> Result<bool> {
    Ok(self.table().write().rows.remove(&id).is_some())
  }
}

#[async_trait]
impl OrderStore for InMemoryStore {
  async fn store_order(&self, order: NewOrder) -> Result<Order> {
    if self.fail_next_order_write.swap(false, Ordering::SeqCst) {
      return Err(BoxOfficeError::persistence(anyhow!("order write rejected by store")));
    }

    let mut tables = self.orders.write();
    let order_id = tables.orders.allocate_id();
    let mut lines = Vec::with_capacity(order.lines.len());
    for draft in order.lines {
      let line = OrderLine {
        id: tables.lines.allocate_id(),
        order_id: Some(order_id),
        movie_id: Some(draft.movie_id),
        quantity: draft.quantity,
        unit_price_at_purchase: draft.unit_price_at_purchase,
      };
      tables.lines.rows.insert(line.id, line.clone());
      lines.push(line);
    }

    let stored = Order {
      id: order_id,
      user_id: order.user_id,
      user_email: order.user_email,
      created_at: Utc::now(),
      lines,
    };
    // Header rows are kept without lines; `assemble` joins them on read.
    tables.orders.rows.insert(
      order_id,
      Order {
        lines: Vec::new(),
        ..stored.clone()
      },
    );
    Ok(stored)
  }

  async fn find_order(&self, id: i64) -> Result<Option<Order>> {
    let tables = self.orders.read();
    Ok(tables.orders.rows.get(&id).map(|o| Self::assemble(o, &tables.lines)))
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    let tables = self.orders.read();
    Ok(
      tables
        .orders
        .rows
        .values()
        .map(|o| Self::assemble(o, &tables.lines))
        .collect(),
    )
  }

  async fn orders_for_user(&self, user_id: &str, role: UserRole) -> Result<Vec<Order>> {
    let tables = self.orders.read();
    Ok(
      tables
        .orders
        .rows
        .values()
        .filter(|o| role == UserRole::Admin || o.user_id == user_id)
        .map(|o| Self::assemble(o, &tables.lines))
        .collect(),
    )
  }

  async fn list_order_lines(&self) -> Result<Vec<OrderLine>> {
    Ok(self.orders.read().lines.rows.values().cloned().collect())
  }
}
