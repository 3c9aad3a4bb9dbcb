// ticketing_app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use boxoffice::report::TicketSummary;
use boxoffice::{format_currency, BoxOfficeError, EntityStore, Movie, Order, OrderStore, UserRole};
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::handlers::report_handlers::document_response;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  #[serde(flatten)]
  pub order: Order,
  pub total: String,
  pub number_of_tickets: u32,
}

impl From<Order> for OrderView {
  fn from(order: Order) -> Self {
    Self {
      total: format_currency(order.total()),
      number_of_tickets: order.ticket_count(),
      order,
    }
  }
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id, role = ?auth_user.role))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state
    .store
    .orders_for_user(&auth_user.user_id, auth_user.role)
    .await?;
  info!(count = orders.len(), "Orders fetched.");
  let views: Vec<OrderView> = orders.into_iter().map(OrderView::from).collect();
  Ok(HttpResponse::Ok().json(views))
}

/// The "Movie Ticket" PDF for one order. Other users' orders look missing
/// unless the caller is an admin.
#[instrument(name = "handler::order_ticket", skip(app_state, auth_user, path), fields(user_id = %auth_user.user_id, order_id = *path))]
pub async fn order_ticket_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let not_found = || BoxOfficeError::NotFound {
    entity: "Order",
    id: order_id,
  };

  let order = app_state.store.find_order(order_id).await?.ok_or_else(not_found)?;
  if auth_user.role != UserRole::Admin && order.user_id != auth_user.user_id {
    return Err(not_found().into());
  }

  let movies = EntityStore::<Movie>::list(app_state.store.as_ref()).await?;
  let summary = TicketSummary::from_order(&order, &order.user_email, &movies);
  let output = summary.render(app_state.renderer.as_ref())?;
  Ok(document_response(output))
}
