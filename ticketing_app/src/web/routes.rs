// ticketing_app/src/web/routes.rs

use actix_web::{web, HttpResponse};
use boxoffice::{Actor, Cinema, Movie, Producer};
use serde_json::json;

use crate::state::AppState;
use crate::web::handlers::catalog_handlers::{
  create_entity, delete_entity, get_entity, list_entities, list_order_items_handler, update_entity, CatalogEntity,
};
use crate::web::handlers::{cart_handlers, checkout_handlers, order_handlers, report_handlers};
use boxoffice::{EntityStore, TicketStore};

async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "status": "ok",
    "store": app_state.config.store_backend.as_str(),
    "cartSessions": app_state.carts.session_count(),
  }))
}

/// `GET/POST /{kind}` and `GET/PUT/DELETE /{kind}/{id}` for one entity.
fn catalog_scope<T>(path: &str) -> actix_web::Scope
where
  T: CatalogEntity,
  dyn TicketStore: EntityStore<T>,
{
  web::scope(path)
    .route("", web::get().to(list_entities::<T>))
    .route("", web::post().to(create_entity::<T>))
    .route("/{id}", web::get().to(get_entity::<T>))
    .route("/{id}", web::put().to(update_entity::<T>))
    .route("/{id}", web::delete().to(delete_entity::<T>))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(catalog_scope::<Actor>("/actors"))
      .service(catalog_scope::<Producer>("/producers"))
      .service(catalog_scope::<Cinema>("/cinemas"))
      .service(catalog_scope::<Movie>("/movies"))
      .route("/order-items", web::get().to(list_order_items_handler))
      .route("/reports/{kind}", web::get().to(report_handlers::report_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("/items/{movie_id}", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{movie_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
      )
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{id}/ticket", web::get().to(order_handlers::order_ticket_handler)),
      ),
  );
}
