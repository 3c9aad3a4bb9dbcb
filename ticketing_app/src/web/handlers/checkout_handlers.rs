// ticketing_app/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use boxoffice::{format_currency, ContextData, PipelineResult};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, CartSession};

#[instrument(
    name = "handler::checkout",
    skip(app_state, auth_user, session),
    fields(user_id = %auth_user.user_id, session_id = %session.session_id)
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  // Held until the response is built; a second checkout on this session is refused meanwhile.
  let _lease = app_state.carts.begin_checkout(&session.session_id).ok_or_else(|| {
    warn!("Checkout already in progress for this session.");
    AppError::Conflict("A checkout is already in progress for this cart.".to_string())
  })?;

  let ctx = ContextData::new(CheckoutCtxData::new(
    app_state.get_ref().clone(),
    session.session_id.clone(),
    auth_user.user_id.clone(),
    auth_user.email.clone(),
  ));

  match app_state.pipelines.checkout.run(ctx.clone()).await {
    Ok(PipelineResult::Completed) => {
      let guard = ctx.read();
      let order = guard.order.as_ref().ok_or_else(|| {
        warn!("Checkout pipeline completed but no order was recorded.");
        AppError::Internal("Checkout completed, but order details are unavailable.".to_string())
      })?;

      info!(order_id = order.id, cart_cleared = guard.cart_cleared, "Checkout completed.");
      Ok(HttpResponse::Created().json(json!({
          "message": "Your order has been completed successfully.",
          "orderId": order.id,
          "total": format_currency(order.total()),
          "numberOfTickets": order.ticket_count(),
          "confirmation": guard.confirmation,
      })))
    }
    Ok(PipelineResult::Stopped) => {
      warn!("Checkout pipeline was stopped by a handler.");
      Err(AppError::Internal("Checkout was halted.".to_string()))
    }
    Err(app_err) => {
      // The cart is only cleared after the order is stored, so it is still intact here.
      warn!(error = %app_err, "Checkout pipeline failed; cart retained.");
      Err(app_err)
    }
  }
}
