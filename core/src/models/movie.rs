// core/src/models/movie.rs

use super::Entity;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovieCategory {
  Action,
  Comedy,
  Drama,
  Documentary,
  Cartoon,
  Horror,
}

impl MovieCategory {
  pub const ALL: [MovieCategory; 6] = [
    MovieCategory::Action,
    MovieCategory::Comedy,
    MovieCategory::Drama,
    MovieCategory::Documentary,
    MovieCategory::Cartoon,
    MovieCategory::Horror,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MovieCategory::Action => "Action",
      MovieCategory::Comedy => "Comedy",
      MovieCategory::Drama => "Drama",
      MovieCategory::Documentary => "Documentary",
      MovieCategory::Cartoon => "Cartoon",
      MovieCategory::Horror => "Horror",
    }
  }
}

impl fmt::Display for MovieCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MovieCategory {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    MovieCategory::ALL
      .iter()
      .copied()
      .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown movie category '{}'", s))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  #[serde(default)]
  pub id: i64,
  pub name: String,
  pub description: String,
  #[serde(with = "rust_decimal::serde::str")]
  pub price: Decimal,
  pub image_url: String,
  pub start_date: DateTime<Utc>,
  pub end_date: DateTime<Utc>,
  pub category: MovieCategory,
  pub cinema_id: i64,
  pub producer_id: i64,
}

impl Entity for Movie {
  const KIND: &'static str = "Movie";

  fn id(&self) -> i64 {
    self.id
  }

  fn set_id(&mut self, id: i64) {
    self.id = id;
  }
}
