// ticketing_app/src/db/seed.rs

//! Demo catalog for a fresh store.

use boxoffice::{Actor, Cinema, EntityStore, Movie, MovieCategory, Producer, TicketStore};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

/// Inserts a small catalog unless the store already has movies.
/// Returns the number of movies added.
pub async fn seed_catalog(store: &dyn TicketStore) -> boxoffice::Result<usize> {
  if !EntityStore::<Movie>::list(store).await?.is_empty() {
    info!("Catalog already present; skipping seed.");
    return Ok(0);
  }

  let cinemas = [
    ("Cinema 1", "https://dotnethow.net/images/cinemas/cinema-1.jpeg", "Downtown screens"),
    ("Cinema 2", "https://dotnethow.net/images/cinemas/cinema-2.jpeg", "Riverside multiplex"),
  ];
  let mut cinema_ids = Vec::new();
  for (name, logo, description) in cinemas {
    let cinema = Cinema {
      id: 0,
      logo: logo.to_string(),
      name: name.to_string(),
      description: description.to_string(),
    };
    cinema_ids.push(EntityStore::<Cinema>::add(store, cinema).await?.id);
  }

  let mut producer_ids = Vec::new();
  for idx in 1..=2 {
    let producer = Producer {
      id: 0,
      profile_picture_url: format!("https://dotnethow.net/images/producers/producer-{}.jpeg", idx),
      full_name: format!("Producer {}", idx),
      bio: "Independent producer.".to_string(),
    };
    producer_ids.push(EntityStore::<Producer>::add(store, producer).await?.id);
  }

  for idx in 1..=3 {
    let actor = Actor {
      id: 0,
      profile_picture_url: format!("https://dotnethow.net/images/actors/actor-{}.jpeg", idx),
      full_name: format!("Actor {}", idx),
      bio: "Stage and screen.".to_string(),
    };
    EntityStore::<Actor>::add(store, actor).await?;
  }

  let now = Utc::now();
  let movies = [
    ("Life", Decimal::new(3950, 2), MovieCategory::Documentary),
    ("The Shawshank Redemption", Decimal::new(2950, 2), MovieCategory::Action),
    ("Ghost", Decimal::new(3950, 2), MovieCategory::Horror),
    ("Scoob", Decimal::new(3950, 2), MovieCategory::Cartoon),
  ];
  let count = movies.len();
  for (idx, (name, price, category)) in movies.into_iter().enumerate() {
    let movie = Movie {
      id: 0,
      name: name.to_string(),
      description: format!("{} description", name),
      price,
      image_url: format!("https://dotnethow.net/images/movies/movie-{}.jpeg", idx + 1),
      start_date: now - Duration::days(10),
      end_date: now + Duration::days(10 + idx as i64),
      category,
      cinema_id: cinema_ids[idx % cinema_ids.len()],
      producer_id: producer_ids[idx % producer_ids.len()],
    };
    EntityStore::<Movie>::add(store, movie).await?;
  }

  info!(movies = count, "Seeded demo catalog.");
  Ok(count)
}

#[cfg(test)]
mod tests {
  use super::*;
  use boxoffice::InMemoryStore;

  #[tokio::test]
  async fn test_seed_runs_once() {
    let store = InMemoryStore::new();

    assert_eq!(seed_catalog(&store).await.unwrap(), 4);
    assert_eq!(seed_catalog(&store).await.unwrap(), 0);
    assert_eq!(EntityStore::<Cinema>::list(&store).await.unwrap().len(), 2);
  }
}
