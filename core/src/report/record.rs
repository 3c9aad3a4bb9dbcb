// core/src/report/record.rs

//! Projection of store records into report fields.

use crate::models::{Actor, Cinema, Movie, Order, OrderLine, Producer};
use crate::money::format_currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(Option<String>),
  Number(i64),
  Money(Decimal),
  Timestamp(DateTime<Utc>),
  /// Display name of a linked record, `None` when the link is dangling.
  Related(Option<String>),
  Url(Option<String>),
}

impl FieldValue {
  pub fn text(value: &str) -> Self {
    FieldValue::Text(Some(value.to_string()))
  }

  pub fn url(value: &str) -> Self {
    let trimmed = value.trim();
    FieldValue::Url((!trimmed.is_empty()).then(|| trimmed.to_string()))
  }

  /// Text shown in a non-image cell.
  pub fn render(&self) -> String {
    match self {
      FieldValue::Text(v) | FieldValue::Url(v) => v.clone().unwrap_or_default(),
      FieldValue::Number(n) => n.to_string(),
      FieldValue::Money(d) => format_currency(*d),
      FieldValue::Timestamp(t) => t.format(DATE_FORMAT).to_string(),
      FieldValue::Related(Some(name)) if !name.trim().is_empty() => name.clone(),
      FieldValue::Related(_) => NOT_AVAILABLE.to_string(),
    }
  }

  /// The URL to fetch for an image column, if any.
  pub fn as_url(&self) -> Option<&str> {
    match self {
      FieldValue::Url(Some(url)) | FieldValue::Text(Some(url)) if !url.trim().is_empty() => Some(url.trim()),
      _ => None,
    }
  }
}

/// A record that can be laid out as one report row.
pub trait ReportRecord: Send + Sync {
  /// Id quoted in diagnostics.
  fn record_id(&self) -> i64;

  /// Value of `field`, or `None` when the record has no such field.
  fn field(&self, field: &str) -> Option<FieldValue>;
}

impl<R: ReportRecord + ?Sized> ReportRecord for Box<R> {
  fn record_id(&self) -> i64 {
    (**self).record_id()
  }

  fn field(&self, field: &str) -> Option<FieldValue> {
    (**self).field(field)
  }
}

impl ReportRecord for Actor {
  fn record_id(&self) -> i64 {
    self.id
  }

  fn field(&self, field: &str) -> Option<FieldValue> {
    match field {
      "ProfilePictureURL" => Some(FieldValue::url(&self.profile_picture_url)),
      "FullName" => Some(FieldValue::text(&self.full_name)),
      "Bio" => Some(FieldValue::text(&self.bio)),
      _ => None,
    }
  }
}

impl ReportRecord for Producer {
  fn record_id(&self) -> i64 {
    self.id
  }

  fn field(&self, field: &str) -> Option<FieldValue> {
    match field {
      "ProfilePictureURL" => Some(FieldValue::url(&self.profile_picture_url)),
      "FullName" => Some(FieldValue::text(&self.full_name)),
      "Bio" => Some(FieldValue::text(&self.bio)),
      _ => None,
    }
  }
}

impl ReportRecord for Cinema {
  fn record_id(&self) -> i64 {
    self.id
  }

  fn field(&self, field: &str) -> Option<FieldValue> {
    match field {
      "Logo" => Some(FieldValue::url(&self.logo)),
      "Name" => Some(FieldValue::text(&self.name)),
      "Description" => Some(FieldValue::text(&self.description)),
      _ => None,
    }
  }
}

/// A movie joined with its cinema and producer.
#[derive(Debug, Clone)]
pub struct MovieListing {
  pub movie: Movie,
  pub cinema: Option<Cinema>,
  pub producer: Option<Producer>,
}

impl MovieListing {
  /// Joins each movie with its cinema and producer, keeping movie order.
  pub fn join(movies: Vec<Movie>, cinemas: &[Cinema], producers: &[Producer]) -> Vec<MovieListing> {
    let cinemas: HashMap<i64, &Cinema> = cinemas.iter().map(|c| (c.id, c)).collect();
    let producers: HashMap<i64, &Producer> = producers.iter().map(|p| (p.id, p)).collect();
    movies
      .into_iter()
      .map(|movie| MovieListing {
        cinema: cinemas.get(&movie.cinema_id).map(|c| (*c).clone()),
        producer: producers.get(&movie.producer_id).map(|p| (*p).clone()),
        movie,
      })
      .collect()
  }
}

impl ReportRecord for MovieListing {
  fn record_id(&self) -> i64 {
    self.movie.id
  }

  fn field(&self, field: &str) -> Option<FieldValue> {
    let movie = &self.movie;
    match field {
      "Name" => Some(FieldValue::text(&movie.name)),
      "Description" => Some(FieldValue::text(&movie.description)),
      "Price" => Some(FieldValue::Money(movie.price)),
      "ImageURL" => Some(FieldValue::url(&movie.image_url)),
      "StartDate" => Some(FieldValue::Timestamp(movie.start_date)),
      "EndDate" => Some(FieldValue::Timestamp(movie.end_date)),
      "MovieCategory" => Some(FieldValue::text(movie.category.as_str())),
      "Cinema" => Some(FieldValue::Related(self.cinema.as_ref().map(|c| c.name.clone()))),
      "Producer" => Some(FieldValue::Related(self.producer.as_ref().map(|p| p.full_name.clone()))),
      _ => None,
    }
  }
}

/// An order line joined with its movie and order, either of which may be gone.
#[derive(Debug, Clone)]
pub struct OrderItemListing {
  pub line: OrderLine,
  pub movie: Option<Movie>,
  pub order_id: Option<i64>,
}

impl OrderItemListing {
  pub fn join(lines: Vec<OrderLine>, movies: &[Movie], orders: &[Order]) -> Vec<OrderItemListing> {
    let movies: HashMap<i64, &Movie> = movies.iter().map(|m| (m.id, m)).collect();
    lines
      .into_iter()
      .map(|line| OrderItemListing {
        movie: line.movie_id.and_then(|id| movies.get(&id)).map(|m| (*m).clone()),
        order_id: line.order_id.filter(|id| orders.iter().any(|o| o.id == *id)),
        line,
      })
      .collect()
  }
}

impl ReportRecord for OrderItemListing {
  fn record_id(&self) -> i64 {
    self.line.id
  }

  fn field(&self, field: &str) -> Option<FieldValue> {
    match field {
      "Amount" => Some(FieldValue::Number(i64::from(self.line.quantity))),
      "Price" => Some(FieldValue::Money(self.line.unit_price_at_purchase)),
      "Movie" => Some(FieldValue::Related(self.movie.as_ref().map(|m| m.name.clone()))),
      "Order" => Some(FieldValue::Related(self.order_id.map(|id| id.to_string()))),
      _ => None,
    }
  }
}
