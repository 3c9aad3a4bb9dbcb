// core/src/models/user.rs

use std::str::FromStr;

/// Role claim of the caller; admins see every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
  Admin,
  #[default]
  User,
}

impl FromStr for UserRole {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    // Anything that is not an explicit admin claim is treated as a plain user.
    if s.trim().eq_ignore_ascii_case("admin") {
      Ok(UserRole::Admin)
    } else {
      Ok(UserRole::User)
    }
  }
}
