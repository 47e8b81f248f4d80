//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Utc};
use nimbus_core::{
  geolocation::Geolocation,
  observation::{NewDrawing, NewObservation, WeatherCode},
  store::{InsertOutcome, ObservationStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn montreal(address: &str) -> Geolocation {
  Geolocation {
    address:   address.into(),
    latitude:  45.6085,
    longitude: -73.5493,
    city:      "Montreal".into(),
    country:   "Canada".into(),
    region:    "Quebec".into(),
    timezone:  "America/Toronto".into(),
  }
}

fn reading(address: &str, at: &str) -> NewObservation {
  let time_utc: DateTime<Utc> = at.parse().unwrap();
  let tz = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
  NewObservation {
    address:           address.into(),
    temp_c:            -3.4,
    temp_f:            25.88,
    relative_humidity: 81.0,
    rain:              0.0,
    snowfall:          0.21,
    weather_code:      WeatherCode(71),
    timezone:          "America/Toronto".into(),
    time_utc,
    time_local:        time_utc.with_timezone(&tz),
  }
}

// ─── Geolocations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_geolocation_returns_none() {
  let s = store().await;
  assert!(s.get_geolocation("24.48.0.1").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_and_get_geolocation() {
  let s = store().await;
  let geo = montreal("24.48.0.1");

  let outcome = s.insert_geolocation(geo.clone()).await.unwrap();
  assert_eq!(outcome, InsertOutcome::Inserted);

  let fetched = s.get_geolocation("24.48.0.1").await.unwrap().unwrap();
  assert_eq!(fetched, geo);
}

#[tokio::test]
async fn second_insert_for_address_is_ignored() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();

  let mut moved = montreal("24.48.0.1");
  moved.city = "Laval".into();
  moved.latitude = 45.57;
  let outcome = s.insert_geolocation(moved).await.unwrap();
  assert_eq!(outcome, InsertOutcome::AlreadyPresent);

  let fetched = s.get_geolocation("24.48.0.1").await.unwrap().unwrap();
  assert_eq!(fetched.city, "Montreal");
  assert_eq!(fetched.latitude, 45.6085);
}

#[tokio::test]
async fn concurrent_inserts_keep_one_row() {
  let s = store().await;
  let tasks: Vec<_> = (0..8)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.insert_geolocation(montreal("24.48.0.1")).await })
    })
    .collect();

  let mut inserted = 0;
  for task in tasks {
    if task.await.unwrap().unwrap() == InsertOutcome::Inserted {
      inserted += 1;
    }
  }
  assert_eq!(inserted, 1);
}

// ─── Observations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_get_observation() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();

  let obs = s
    .record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z"))
    .await
    .unwrap();
  let fetched = s.get_observation(obs.id).await.unwrap().unwrap();

  assert_eq!(fetched, obs);
  assert_eq!(fetched.weather_code, WeatherCode(71));
  assert_eq!(fetched.time_local.offset().local_minus_utc(), -5 * 3600);
}

#[tokio::test]
async fn observation_ids_increase() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();

  let a = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();
  let b = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();
  assert!(b.id > a.id);
}

#[tokio::test]
async fn observation_requires_known_geolocation() {
  let s = store().await;
  let result = s.record_observation(reading("10.0.0.1", "2024-01-15T12:00:00Z")).await;
  assert!(result.is_err());
}

#[tokio::test]
async fn get_missing_observation_returns_none() {
  let s = store().await;
  assert!(s.get_observation(42).await.unwrap().is_none());
}

// ─── Prior observation ───────────────────────────────────────────────────────

#[tokio::test]
async fn prior_is_latest_strictly_earlier_reading() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();

  let t1 = s.record_observation(reading("24.48.0.1", "2024-01-15T10:00:00Z")).await.unwrap();
  let t2 = s.record_observation(reading("24.48.0.1", "2024-01-15T11:00:00Z")).await.unwrap();
  let t3 = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();

  assert_eq!(s.prior_observation(&t3).await.unwrap(), Some(t2));
  assert_eq!(s.prior_observation(&t1).await.unwrap(), None);
}

#[tokio::test]
async fn prior_orders_by_instant_not_insertion() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();

  let late = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();
  let early = s.record_observation(reading("24.48.0.1", "2024-01-15T09:00:00Z")).await.unwrap();
  let middle = s.record_observation(reading("24.48.0.1", "2024-01-15T10:30:00Z")).await.unwrap();

  assert_eq!(s.prior_observation(&late).await.unwrap(), Some(middle));
  assert_eq!(s.prior_observation(&early).await.unwrap(), None);
}

#[tokio::test]
async fn prior_tie_prefers_lower_id() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();

  let first = s.record_observation(reading("24.48.0.1", "2024-01-15T11:00:00Z")).await.unwrap();
  s.record_observation(reading("24.48.0.1", "2024-01-15T11:00:00Z")).await.unwrap();
  let current = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();

  assert_eq!(s.prior_observation(&current).await.unwrap(), Some(first));
}

#[tokio::test]
async fn prior_is_scoped_to_location() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();
  s.insert_geolocation(montreal("24.48.0.2")).await.unwrap();

  s.record_observation(reading("24.48.0.2", "2024-01-15T11:00:00Z")).await.unwrap();
  let current = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();

  assert_eq!(s.prior_observation(&current).await.unwrap(), None);
}

// ─── Drawings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn attach_drawing_to_existing_observation() {
  let s = store().await;
  s.insert_geolocation(montreal("24.48.0.1")).await.unwrap();
  let obs = s.record_observation(reading("24.48.0.1", "2024-01-15T12:00:00Z")).await.unwrap();

  let drawing = s
    .attach_drawing(obs.id, NewDrawing { data_uri: "data:image/png;base64,AAAA".into() })
    .await
    .unwrap()
    .unwrap();

  assert_eq!(drawing.observation_id, obs.id);
  assert_eq!(drawing.size_bytes, 26);
}

#[tokio::test]
async fn attach_drawing_to_missing_observation_returns_none() {
  let s = store().await;
  let result = s
    .attach_drawing(99, NewDrawing { data_uri: "data:image/png;base64,AAAA".into() })
    .await
    .unwrap();
  assert!(result.is_none());
}
