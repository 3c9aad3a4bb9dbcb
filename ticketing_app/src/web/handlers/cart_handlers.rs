// ticketing_app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use boxoffice::{Cart, CartItem, EntityStore, Movie};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::CartSession;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub items: Vec<CartItem>,
  pub total: String,
  pub ticket_count: u32,
}

impl From<&Cart> for CartView {
  fn from(cart: &Cart) -> Self {
    Self {
      items: cart.items().to_vec(),
      total: cart.total_display(),
      ticket_count: cart.ticket_count(),
    }
  }
}

/// Current catalog entries for the movies in the session's cart.
async fn carted_movies(app_state: &AppState, session_id: &str) -> Result<Vec<Movie>, AppError> {
  let ids: Vec<i64> = app_state
    .carts
    .read(session_id, |c| c.items().iter().map(|i| i.movie_id).collect())
    .unwrap_or_default();

  let mut movies = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(movie) = EntityStore::<Movie>::find(app_state.store.as_ref(), id).await? {
      movies.push(movie);
    }
  }
  Ok(movies)
}

/// Applies `f` to an existing cart, reprices it, and renders it. A session
/// without a cart renders as empty and is not created.
fn reprice_existing(app_state: &AppState, session_id: &str, movies: &[Movie], f: impl FnOnce(&mut Cart)) -> CartView {
  app_state
    .carts
    .update_existing(session_id, |c| {
      f(c);
      c.reprice(movies);
      CartView::from(&*c)
    })
    .unwrap_or_else(|| CartView::from(&Cart::new()))
}

#[instrument(name = "handler::view_cart", skip(app_state, session), fields(session_id = %session.session_id))]
pub async fn view_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  let movies = carted_movies(&app_state, &session.session_id).await?;
  let view = reprice_existing(&app_state, &session.session_id, &movies, |_| {});
  Ok(HttpResponse::Ok().json(view))
}

/// Adds one ticket. An unknown movie id leaves the cart as it was.
#[instrument(name = "handler::add_to_cart", skip(app_state, session, path), fields(session_id = %session.session_id, movie_id = *path))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let movie_id = path.into_inner();
  let mut movies = carted_movies(&app_state, &session.session_id).await?;
  let Some(movie) = EntityStore::<Movie>::find(app_state.store.as_ref(), movie_id).await? else {
    info!("Movie not in catalog; cart unchanged.");
    let view = reprice_existing(&app_state, &session.session_id, &movies, |_| {});
    return Ok(HttpResponse::Ok().json(view));
  };

  movies.push(movie.clone());
  let view = app_state.carts.update(&session.session_id, |c| {
    c.add_item(Some(&movie));
    c.reprice(&movies);
    CartView::from(&*c)
  });
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, session, path), fields(session_id = %session.session_id, movie_id = *path))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let movie_id = path.into_inner();
  let movies = carted_movies(&app_state, &session.session_id).await?;
  let view = reprice_existing(&app_state, &session.session_id, &movies, |c| c.remove_item(movie_id));
  Ok(HttpResponse::Ok().json(view))
}
