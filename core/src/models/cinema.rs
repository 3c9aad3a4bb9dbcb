// core/src/models/cinema.rs

use super::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
  #[serde(default)]
  pub id: i64,
  /// URL of the cinema logo, embedded in the cinemas report.
  pub logo: String,
  pub name: String,
  pub description: String,
}

impl Entity for Cinema {
  const KIND: &'static str = "Cinema";

  fn id(&self) -> i64 {
    self.id
  }

  fn set_id(&mut self, id: i64) {
    self.id = id;
  }
}
