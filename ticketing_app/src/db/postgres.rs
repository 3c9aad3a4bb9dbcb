// ticketing_app/src/db/postgres.rs

//! `TicketStore` over a Postgres pool, using runtime-checked `sqlx` queries.

use async_trait::async_trait;
use boxoffice::models::Entity;
use boxoffice::{
  Actor, BoxOfficeError, Cinema, EntityStore, Movie, MovieCategory, NewOrder, Order, OrderLine, OrderStore, Producer,
  UserRole,
};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;
type StoreResult<T> = boxoffice::Result<T>;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Creates any missing tables. Safe to run on every startup.
  pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
    info!("Database schema verified.");
    Ok(())
  }
}

fn store_err(err: sqlx::Error) -> BoxOfficeError {
  BoxOfficeError::persistence(err)
}

fn decode_err(column: &str, message: String) -> sqlx::Error {
  sqlx::Error::ColumnDecode {
    index: column.to_string(),
    source: message.into(),
  }
}

/// How one catalog entity maps onto its table. `COLUMNS` excludes `id`.
pub trait PgEntity: Entity {
  const TABLE: &'static str;
  const COLUMNS: &'static [&'static str];

  fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

  /// Binds values in `COLUMNS` order.
  fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q>;
}

impl PgEntity for Actor {
  const TABLE: &'static str = "actors";
  const COLUMNS: &'static [&'static str] = &["profile_picture_url", "full_name", "bio"];

  fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
    Ok(Actor {
      id: row.try_get("id")?,
      profile_picture_url: row.try_get("profile_picture_url")?,
      full_name: row.try_get("full_name")?,
      bio: row.try_get("bio")?,
    })
  }

  fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
    query
      .bind(self.profile_picture_url.clone())
      .bind(self.full_name.clone())
      .bind(self.bio.clone())
  }
}

impl PgEntity for Producer {
  const TABLE: &'static str = "producers";
  const COLUMNS: &'static [&'static str] = &["profile_picture_url", "full_name", "bio"];

  fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
    Ok(Producer {
      id: row.try_get("id")?,
      profile_picture_url: row.try_get("profile_picture_url")?,
      full_name: row.try_get("full_name")?,
      bio: row.try_get("bio")?,
    })
  }

  fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
    query
      .bind(self.profile_picture_url.clone())
      .bind(self.full_name.clone())
      .bind(self.bio.clone())
  }
}

impl PgEntity for Cinema {
  const TABLE: &'static str = "cinemas";
  const COLUMNS: &'static [&'static str] = &["logo", "name", "description"];

  fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
    Ok(Cinema {
      id: row.try_get("id")?,
      logo: row.try_get("logo")?,
      name: row.try_get("name")?,
      description: row.try_get("description")?,
    })
  }

  fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
    query
      .bind(self.logo.clone())
      .bind(self.name.clone())
      .bind(self.description.clone())
  }
}

impl PgEntity for Movie {
  const TABLE: &'static str = "movies";
  const COLUMNS: &'static [&'static str] = &[
    "name",
    "description",
    "price",
    "image_url",
    "start_date",
    "end_date",
    "movie_category",
    "cinema_id",
    "producer_id",
  ];

  fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
    let category: String = row.try_get("movie_category")?;
    Ok(Movie {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
      description: row.try_get("description")?,
      price: row.try_get("price")?,
      image_url: row.try_get("image_url")?,
      start_date: row.try_get("start_date")?,
      end_date: row.try_get("end_date")?,
      category: category
        .parse::<MovieCategory>()
        .map_err(|e| decode_err("movie_category", e))?,
      cinema_id: row.try_get("cinema_id")?,
      producer_id: row.try_get("producer_id")?,
    })
  }

  fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
    query
      .bind(self.name.clone())
      .bind(self.description.clone())
      .bind(self.price)
      .bind(self.image_url.clone())
      .bind(self.start_date)
      .bind(self.end_date)
      .bind(self.category.as_str())
      .bind(self.cinema_id)
      .bind(self.producer_id)
  }
}

fn select_sql<T: PgEntity>() -> String {
  format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

fn placeholders(count: usize, start: usize) -> Vec<String> {
  (start..start + count).map(|n| format!("${}", n)).collect()
}

#[async_trait]
impl<T: PgEntity> EntityStore<T> for PgStore {
  #[instrument(name = "PgStore::find", skip(self), fields(entity = T::KIND))]
  async fn find(&self, id: i64) -> StoreResult<Option<T>> {
    let sql = format!("{} WHERE id = $1", select_sql::<T>());
    let row = sqlx::query(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err)?;
    row.as_ref().map(T::from_row).transpose().map_err(store_err)
  }

  #[instrument(name = "PgStore::list", skip(self), fields(entity = T::KIND))]
  async fn list(&self) -> StoreResult<Vec<T>> {
    let sql = format!("{} ORDER BY id", select_sql::<T>());
    let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(store_err)?;
    rows.iter().map(T::from_row).collect::<Result<_, _>>().map_err(store_err)
  }

  #[instrument(name = "PgStore::add", skip(self, record), fields(entity = T::KIND))]
  async fn add(&self, mut record: T) -> StoreResult<T> {
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
      T::TABLE,
      T::COLUMNS.join(", "),
      placeholders(T::COLUMNS.len(), 1).join(", ")
    );
    let id: i64 = record
      .bind_columns(sqlx::query(&sql))
      .fetch_one(&self.pool)
      .await
      .and_then(|row| row.try_get("id"))
      .map_err(store_err)?;
    record.set_id(id);
    debug!(id, "Record inserted.");
    Ok(record)
  }

  #[instrument(name = "PgStore::update", skip(self, record), fields(entity = T::KIND, id = record.id()))]
  async fn update(&self, record: T) -> StoreResult<T> {
    let assignments: Vec<String> = T::COLUMNS
      .iter()
      .zip(placeholders(T::COLUMNS.len(), 1))
      .map(|(column, slot)| format!("{} = {}", column, slot))
      .collect();
    let sql = format!(
      "UPDATE {} SET {} WHERE id = ${}",
      T::TABLE,
      assignments.join(", "),
      T::COLUMNS.len() + 1
    );
    let result = record
      .bind_columns(sqlx::query(&sql))
      .bind(record.id())
      .execute(&self.pool)
      .await
      .map_err(store_err)?;

    if result.rows_affected() == 0 {
      return Err(BoxOfficeError::Concurrency {
        entity: T::KIND,
        id: record.id(),
      });
    }
    Ok(record)
  }

  #[instrument(name = "PgStore::remove", skip(self), fields(entity = T::KIND))]
  async fn remove(&self, id: i64) -> StoreResult<bool> {
    let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
    let result = sqlx::query(&sql)
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(store_err)?;
    Ok(result.rows_affected() > 0)
  }
}

const ORDER_COLUMNS: &str = "id, user_id, email, created_at";
const LINE_COLUMNS: &str = "id, order_id, movie_id, amount, price";

fn order_header(row: &PgRow) -> Result<Order, sqlx::Error> {
  let created_at: DateTime<Utc> = row.try_get("created_at")?;
  Ok(Order {
    id: row.try_get("id")?,
    user_id: row.try_get("user_id")?,
    user_email: row.try_get("email")?,
    created_at,
    lines: Vec::new(),
  })
}

fn order_line(row: &PgRow) -> Result<OrderLine, sqlx::Error> {
  let amount: i32 = row.try_get("amount")?;
  Ok(OrderLine {
    id: row.try_get("id")?,
    order_id: row.try_get("order_id")?,
    movie_id: row.try_get("movie_id")?,
    quantity: u32::try_from(amount).map_err(|_| decode_err("amount", format!("negative amount {}", amount)))?,
    unit_price_at_purchase: row.try_get("price")?,
  })
}

impl PgStore {
  /// Loads the lines of `orders` in one query and attaches them.
  async fn attach_lines(&self, mut orders: Vec<Order>) -> StoreResult<Vec<Order>> {
    if orders.is_empty() {
      return Ok(orders);
    }
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let sql = format!("SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY id", LINE_COLUMNS);
    let rows = sqlx::query(&sql)
      .bind(ids)
      .fetch_all(&self.pool)
      .await
      .map_err(store_err)?;

    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for row in &rows {
      let line = order_line(row).map_err(store_err)?;
      if let Some(order_id) = line.order_id {
        by_order.entry(order_id).or_default().push(line);
      }
    }
    for order in &mut orders {
      order.lines = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
  }

  async fn fetch_orders(&self, query: PgQuery<'_>) -> StoreResult<Vec<Order>> {
    let rows = query.fetch_all(&self.pool).await.map_err(store_err)?;
    let headers = rows
      .iter()
      .map(order_header)
      .collect::<Result<Vec<_>, _>>()
      .map_err(store_err)?;
    self.attach_lines(headers).await
  }
}

#[async_trait]
impl OrderStore for PgStore {
  /// Header and lines are written in one transaction; nothing is visible
  /// unless every insert succeeds.
  #[instrument(name = "PgStore::store_order", skip(self, order), fields(lines = order.lines.len()))]
  async fn store_order(&self, order: NewOrder) -> StoreResult<Order> {
    let mut tx = self.pool.begin().await.map_err(store_err)?;

    let header_row = sqlx::query("INSERT INTO orders (user_id, email) VALUES ($1, $2) RETURNING id, created_at")
      .bind(&order.user_id)
      .bind(&order.user_email)
      .fetch_one(&mut *tx)
      .await
      .map_err(store_err)?;
    let order_id: i64 = header_row.try_get("id").map_err(store_err)?;
    let created_at: DateTime<Utc> = header_row.try_get("created_at").map_err(store_err)?;

    let mut lines = Vec::with_capacity(order.lines.len());
    for draft in &order.lines {
      let amount = i32::try_from(draft.quantity)
        .map_err(|_| BoxOfficeError::Validation(format!("Ticket quantity {} is too large.", draft.quantity)))?;
      let line_id: i64 =
        sqlx::query("INSERT INTO order_items (order_id, movie_id, amount, price) VALUES ($1, $2, $3, $4) RETURNING id")
          .bind(order_id)
          .bind(draft.movie_id)
          .bind(amount)
          .bind(draft.unit_price_at_purchase)
          .fetch_one(&mut *tx)
          .await
          .and_then(|row| row.try_get("id"))
          .map_err(store_err)?;
      lines.push(OrderLine {
        id: line_id,
        order_id: Some(order_id),
        movie_id: Some(draft.movie_id),
        quantity: draft.quantity,
        unit_price_at_purchase: draft.unit_price_at_purchase,
      });
    }

    tx.commit().await.map_err(store_err)?;
    info!(order_id, "Order committed.");

    Ok(Order {
      id: order_id,
      user_id: order.user_id,
      user_email: order.user_email,
      created_at,
      lines,
    })
  }

  async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
    let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
    let mut found = self.fetch_orders(sqlx::query(&sql).bind(id)).await?;
    Ok(found.pop())
  }

  async fn list_orders(&self) -> StoreResult<Vec<Order>> {
    let sql = format!("SELECT {} FROM orders ORDER BY id", ORDER_COLUMNS);
    self.fetch_orders(sqlx::query(&sql)).await
  }

  #[instrument(name = "PgStore::orders_for_user", skip(self))]
  async fn orders_for_user(&self, user_id: &str, role: UserRole) -> StoreResult<Vec<Order>> {
    match role {
      UserRole::Admin => self.list_orders().await,
      UserRole::User => {
        let sql = format!("SELECT {} FROM orders WHERE user_id = $1 ORDER BY id", ORDER_COLUMNS);
        self.fetch_orders(sqlx::query(&sql).bind(user_id.to_string())).await
      }
    }
  }

  async fn list_order_lines(&self) -> StoreResult<Vec<OrderLine>> {
    let sql = format!("SELECT {} FROM order_items ORDER BY id", LINE_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(store_err)?;
    rows.iter().map(order_line).collect::<Result<_, _>>().map_err(store_err)
  }
}
