// ticketing_app/src/web/handlers/catalog_handlers.rs

//! CRUD for actors, producers, cinemas and movies. One generic handler set,
//! instantiated per entity in `routes.rs`.

use actix_web::{web, HttpResponse};
use boxoffice::models::Entity;
use boxoffice::{Actor, BoxOfficeError, Cinema, EntityStore, Movie, OrderStore, Producer, TicketStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

/// Field checks applied before a record is written.
pub trait CatalogEntity: Entity + Serialize + DeserializeOwned {
  fn validate(&self) -> Result<(), String>;
}

fn require(value: &str, field: &str) -> Result<(), String> {
  if value.trim().is_empty() {
    Err(format!("{} is required.", field))
  } else {
    Ok(())
  }
}

impl CatalogEntity for Actor {
  fn validate(&self) -> Result<(), String> {
    require(&self.full_name, "Full name")?;
    require(&self.profile_picture_url, "Profile picture")
  }
}

impl CatalogEntity for Producer {
  fn validate(&self) -> Result<(), String> {
    require(&self.full_name, "Full name")?;
    require(&self.profile_picture_url, "Profile picture")
  }
}

impl CatalogEntity for Cinema {
  fn validate(&self) -> Result<(), String> {
    require(&self.name, "Cinema name")?;
    require(&self.logo, "Cinema logo")
  }
}

impl CatalogEntity for Movie {
  fn validate(&self) -> Result<(), String> {
    require(&self.name, "Name")?;
    if self.price.is_sign_negative() {
      return Err("Price cannot be negative.".to_string());
    }
    // Stored as NUMERIC(12, 2); anything finer would be rounded on write.
    if self.price != self.price.round_dp(2) {
      return Err("Price cannot have more than 2 decimal places.".to_string());
    }
    if self.end_date < self.start_date {
      return Err("End date must not be before start date.".to_string());
    }
    Ok(())
  }
}

#[instrument(name = "handler::list_entities", skip(app_state), fields(entity = T::KIND))]
pub async fn list_entities<T>(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError>
where
  T: CatalogEntity,
  dyn TicketStore: EntityStore<T>,
{
  let records = EntityStore::<T>::list(app_state.store.as_ref()).await?;
  info!(count = records.len(), "Fetched records.");
  Ok(HttpResponse::Ok().json(records))
}

#[instrument(name = "handler::get_entity", skip(app_state, path), fields(entity = T::KIND, id = *path))]
pub async fn get_entity<T>(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError>
where
  T: CatalogEntity,
  dyn TicketStore: EntityStore<T>,
{
  let id = path.into_inner();
  let record = EntityStore::<T>::find(app_state.store.as_ref(), id)
    .await?
    .ok_or(BoxOfficeError::NotFound { entity: T::KIND, id })?;
  Ok(HttpResponse::Ok().json(record))
}

#[instrument(name = "handler::create_entity", skip(app_state, body), fields(entity = T::KIND))]
pub async fn create_entity<T>(app_state: web::Data<AppState>, body: web::Json<T>) -> Result<HttpResponse, AppError>
where
  T: CatalogEntity,
  dyn TicketStore: EntityStore<T>,
{
  let record = body.into_inner();
  record.validate().map_err(AppError::Validation)?;

  let created = EntityStore::<T>::add(app_state.store.as_ref(), record).await?;
  info!(id = created.id(), "Record created.");
  Ok(HttpResponse::Created().json(created))
}

/// A stale write (the row vanished between read and write) answers 404 when
/// the record is really gone and 409 otherwise.
#[instrument(name = "handler::update_entity", skip(app_state, path, body), fields(entity = T::KIND, id = *path))]
pub async fn update_entity<T>(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  body: web::Json<T>,
) -> Result<HttpResponse, AppError>
where
  T: CatalogEntity,
  dyn TicketStore: EntityStore<T>,
{
  let id = path.into_inner();
  let mut record = body.into_inner();
  record.set_id(id);
  record.validate().map_err(AppError::Validation)?;

  let store = app_state.store.as_ref();
  match EntityStore::<T>::update(store, record).await {
    Ok(updated) => Ok(HttpResponse::Ok().json(updated)),
    Err(BoxOfficeError::Concurrency { entity, id }) => {
      if EntityStore::<T>::find(store, id).await?.is_none() {
        warn!("Update targeted a record that no longer exists.");
        Err(BoxOfficeError::NotFound { entity, id }.into())
      } else {
        Err(BoxOfficeError::Concurrency { entity, id }.into())
      }
    }
    Err(e) => Err(e.into()),
  }
}

#[instrument(name = "handler::delete_entity", skip(app_state, path), fields(entity = T::KIND, id = *path))]
pub async fn delete_entity<T>(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError>
where
  T: CatalogEntity,
  dyn TicketStore: EntityStore<T>,
{
  let id = path.into_inner();
  if EntityStore::<T>::remove(app_state.store.as_ref(), id).await? {
    info!("Record deleted.");
    Ok(HttpResponse::NoContent().finish())
  } else {
    Err(BoxOfficeError::NotFound { entity: T::KIND, id }.into())
  }
}

#[instrument(name = "handler::list_order_items", skip(app_state))]
pub async fn list_order_items_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let lines = app_state.store.list_order_lines().await?;
  Ok(HttpResponse::Ok().json(json!({ "orderItems": lines })))
}
