//! The `ObservationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `nimbus-store-sqlite`).
//! Resolvers and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  geolocation::Geolocation,
  observation::{NewDrawing, NewObservation, Observation, ObservationDrawing},
};

/// Result of an insert-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  /// A row with the same key already existed; nothing was written.
  AlreadyPresent,
}

/// Persistent keyed storage for geolocations and observations.
///
/// Geolocations are written at most once per address. Observations are
/// append-only. Implementations must be safe to share across concurrent
/// requests.
pub trait ObservationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Geolocations ──────────────────────────────────────────────────────

  /// Look up the stored geolocation for `address`.
  fn get_geolocation<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<Option<Geolocation>, Self::Error>> + Send + 'a;

  /// Insert `geolocation` unless a row for its address already exists.
  ///
  /// A uniqueness conflict is not an error: it is reported as
  /// [`InsertOutcome::AlreadyPresent`] and the existing row is left intact.
  fn insert_geolocation(
    &self,
    geolocation: Geolocation,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  // ── Observations ──────────────────────────────────────────────────────

  /// Append a new observation and return it with its store-assigned id.
  fn record_observation(
    &self,
    input: NewObservation,
  ) -> impl Future<Output = Result<Observation, Self::Error>> + Send + '_;

  fn get_observation(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Observation>, Self::Error>> + Send + '_;

  /// The observation for the same address with the greatest `time_utc`
  /// strictly earlier than `current.time_utc`. Ties on `time_utc` resolve to
  /// the lowest id.
  fn prior_observation<'a>(
    &'a self,
    current: &'a Observation,
  ) -> impl Future<Output = Result<Option<Observation>, Self::Error>> + Send + 'a;

  // ── Drawings ──────────────────────────────────────────────────────────

  /// Attach a drawing to an existing observation. Returns `None` if the
  /// observation does not exist.
  fn attach_drawing(
    &self,
    observation_id: i64,
    drawing: NewDrawing,
  ) -> impl Future<Output = Result<Option<ObservationDrawing>, Self::Error>> + Send + '_;
}
