// ticketing_app/src/pipelines/checkout_pipeline.rs

//! Checkout: validate the cart, persist the order, then clear the cart.
//!
//! The cart is only touched by `clear_cart`, which runs after
//! `finalize_order` has returned a persisted order, and it only removes the
//! tickets that order was built from. Any earlier failure stops the pipeline
//! with the cart untouched.

use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use boxoffice::report::TicketSummary;
use boxoffice::{Cart, ContextData, EntityStore, Movie, OrderFinalizer, Pipeline, PipelineControl, PipelineError};
use tracing::{info, warn};

pub const VALIDATE_CART: &str = "validate_cart";
pub const FINALIZE_ORDER: &str = "finalize_order";
pub const CLEAR_CART: &str = "clear_cart";
pub const PREPARE_CONFIRMATION: &str = "prepare_confirmation";

pub fn build_checkout_pipeline() -> Result<Pipeline<CheckoutCtxData, AppError>, PipelineError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(
    "checkout",
    &[
      (VALIDATE_CART, false),
      (FINALIZE_ORDER, false),
      (CLEAR_CART, false),
      (PREPARE_CONFIRMATION, true),
    ],
  );

  p.on_root(VALIDATE_CART, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      if guard.user_id.trim().is_empty() {
        return Err(AppError::Auth("Checkout requires a signed-in user.".to_string()));
      }
      let empty = guard.app_state.carts.read(&guard.session_id, Cart::is_empty).unwrap_or(true);
      if empty {
        warn!(user_id = %guard.user_id, "Checkout attempted with an empty cart.");
        return Err(AppError::Validation("Your cart is empty.".to_string()));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on_root(FINALIZE_ORDER, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      // Snapshot everything up front; no guard is held across the await.
      let (store, cart, user_id, user_email) = {
        let guard = ctx_data.read();
        (
          guard.app_state.store.clone(),
          guard.app_state.carts.snapshot(&guard.session_id),
          guard.user_id.clone(),
          guard.user_email.clone(),
        )
      };

      let order = OrderFinalizer::new(store).finalize(&cart, &user_id, &user_email).await?;
      info!(order_id = order.id, user_id = %user_id, "Checkout order persisted.");
      let mut guard = ctx_data.write();
      guard.ordered = Some(cart);
      guard.order = Some(order);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on_root(CLEAR_CART, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let state = &mut *guard;
      let (Some(_), Some(ordered)) = (&state.order, &state.ordered) else {
        return Err(AppError::Internal("Refusing to clear a cart without a persisted order.".to_string()));
      };
      state.app_state.carts.update_existing(&state.session_id, |c| c.settle(ordered));
      state.cart_cleared = true;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  p.on_root(PREPARE_CONFIRMATION, |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (store, order) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.order.clone())
      };
      let Some(order) = order else {
        return Ok(PipelineControl::Continue);
      };

      // The order is already committed; a lookup failure here only costs the summary.
      match EntityStore::<Movie>::list(store.as_ref()).await {
        Ok(movies) => {
          let summary = TicketSummary::from_order(&order, &order.user_email, &movies);
          ctx_data.write().confirmation = Some(summary);
        }
        Err(e) => warn!(order_id = order.id, error = %e, "Could not prepare order confirmation."),
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  })?;

  Ok(p)
}
