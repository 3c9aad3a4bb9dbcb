// tests/store_tests.rs
mod common;

use boxoffice::models::NewOrderLine;
use boxoffice::{Actor, BoxOfficeError, EntityStore, NewOrder, OrderStore, UserRole};
use common::*;

fn draft(user_id: &str, movie_id: i64) -> NewOrder {
  NewOrder {
    user_id: user_id.to_string(),
    user_email: format!("{}@example.com", user_id),
    lines: vec![NewOrderLine {
      movie_id,
      quantity: 1,
      unit_price_at_purchase: dec("9.99"),
    }],
  }
}

#[tokio::test]
async fn test_add_assigns_sequential_ids() {
  let (store, _) = seeded_store(&[]).await;

  let first = EntityStore::<Actor>::add(store.as_ref(), actor("One", "")).await.unwrap();
  let second = EntityStore::<Actor>::add(store.as_ref(), actor("Two", "")).await.unwrap();

  assert_eq!((first.id, second.id), (1, 2));
  let listed = EntityStore::<Actor>::list(store.as_ref()).await.unwrap();
  assert_eq!(listed, vec![first, second]);
}

#[tokio::test]
async fn test_update_of_removed_record_is_a_concurrency_error() {
  let (store, _) = seeded_store(&[]).await;
  let mut added = EntityStore::<Actor>::add(store.as_ref(), actor("Gone", "")).await.unwrap();
  assert!(EntityStore::<Actor>::remove(store.as_ref(), added.id).await.unwrap());

  added.bio = "edited".to_string();
  let result = EntityStore::<Actor>::update(store.as_ref(), added.clone()).await;

  match result {
    Err(BoxOfficeError::Concurrency { entity, id }) => {
      assert_eq!(entity, "Actor");
      assert_eq!(id, added.id);
    }
    other => panic!("Expected Concurrency, got {:?}", other),
  }
  assert!(!EntityStore::<Actor>::remove(store.as_ref(), added.id).await.unwrap());
}

#[tokio::test]
async fn test_orders_visible_by_role() {
  let (store, movies) = seeded_store(&[("A", "9.99")]).await;
  store.store_order(draft("alice", movies[0].id)).await.unwrap();
  store.store_order(draft("bob", movies[0].id)).await.unwrap();

  let alice = store.orders_for_user("alice", UserRole::User).await.unwrap();
  assert_eq!(alice.len(), 1);
  assert_eq!(alice[0].user_id, "alice");
  assert_eq!(alice[0].lines.len(), 1);

  let admin = store.orders_for_user("alice", UserRole::Admin).await.unwrap();
  assert_eq!(admin.len(), 2);

  assert!(store.orders_for_user("carol", UserRole::User).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_lines_include_orphans() {
  let (store, movies) = seeded_store(&[("A", "9.99")]).await;
  store.store_order(draft("alice", movies[0].id)).await.unwrap();
  store.insert_orphan_line(None, 2, dec("4.00"));

  let lines = store.list_order_lines().await.unwrap();

  assert_eq!(lines.len(), 2);
  assert_eq!(lines[1].order_id, None);
  assert_eq!(lines[1].movie_id, None);
}
