// core/src/models/person.rs

use super::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  #[serde(default)]
  pub id: i64,
  pub profile_picture_url: String,
  pub full_name: String,
  pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
  #[serde(default)]
  pub id: i64,
  pub profile_picture_url: String,
  pub full_name: String,
  pub bio: String,
}

impl Entity for Actor {
  const KIND: &'static str = "Actor";

  fn id(&self) -> i64 {
    self.id
  }

  fn set_id(&mut self, id: i64) {
    self.id = id;
  }
}

impl Entity for Producer {
  const KIND: &'static str = "Producer";

  fn id(&self) -> i64 {
    self.id
  }

  fn set_id(&mut self, id: i64) {
    self.id = id;
  }
}
