// ticketing_app/src/web/extractors.rs

//! Header-based request identity. Authentication itself happens upstream;
//! these extractors only read what the gateway forwards.

use crate::errors::AppError;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use boxoffice::UserRole;
use futures_util::future::{ready, Ready};
use tracing::warn;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";
pub const USER_ROLE_HEADER: &str = "X-User-Role";
pub const SESSION_ID_HEADER: &str = "X-Session-ID";

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
  req
    .headers()
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: String,
  pub email: String,
  pub role: UserRole,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let Some(user_id) = header_value(req, USER_ID_HEADER) else {
      warn!("AuthenticatedUser extractor: Missing or invalid {} header.", USER_ID_HEADER);
      return ready(Err(AppError::Auth(format!(
        "User authentication required. Missing or invalid {} header.",
        USER_ID_HEADER
      ))));
    };

    let role = header_value(req, USER_ROLE_HEADER)
      .and_then(|r| r.parse::<UserRole>().ok())
      .unwrap_or_default();

    ready(Ok(AuthenticatedUser {
      user_id,
      email: header_value(req, USER_EMAIL_HEADER).unwrap_or_default(),
      role,
    }))
  }
}

/// The caller's cart session id.
#[derive(Debug, Clone)]
pub struct CartSession {
  pub session_id: String,
}

impl FromRequest for CartSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(
      header_value(req, SESSION_ID_HEADER)
        .map(|session_id| CartSession { session_id })
        .ok_or_else(|| AppError::Validation(format!("Missing {} header.", SESSION_ID_HEADER))),
    )
  }
}
