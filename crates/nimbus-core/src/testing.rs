//! In-memory fakes for resolver tests.

use std::{
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  geolocation::Geolocation,
  observation::{NewDrawing, NewObservation, Observation, ObservationDrawing, WeatherCode},
  payload::{CurrentConditions, GeolocationPayload, WeatherPayload},
  provider::{GeolocationProvider, WeatherProvider},
  store::{InsertOutcome, ObservationStore},
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn geolocation_payload() -> GeolocationPayload {
  GeolocationPayload {
    query:        Some("24.48.0.1".into()),
    status:       Some("success".into()),
    message:      None,
    country:      Some("Canada".into()),
    country_code: Some("CA".into()),
    region:       Some("QC".into()),
    region_name:  Some("Quebec".into()),
    city:         Some("Montreal".into()),
    zip:          Some("H1K".into()),
    lat:          Some(45.6085),
    lon:          Some(-73.5493),
    timezone:     Some("America/Toronto".into()),
  }
}

pub fn geolocation(address: &str, timezone: &str) -> Geolocation {
  Geolocation {
    address:   address.into(),
    latitude:  45.6085,
    longitude: -73.5493,
    city:      "Montreal".into(),
    country:   "Canada".into(),
    region:    "Quebec".into(),
    timezone:  timezone.into(),
  }
}

pub fn weather_payload(time: &str, temperature_c: f64) -> WeatherPayload {
  WeatherPayload {
    latitude: Some(45.61),
    longitude: Some(-73.55),
    utc_offset_seconds: Some(0),
    timezone: Some("GMT".into()),
    current: Some(CurrentConditions {
      time: Some(time.into()),
      interval: Some(900),
      temperature_2m: Some(temperature_c),
      relative_humidity_2m: Some(64.0),
      rain: Some(0.4),
      showers: Some(0.0),
      snowfall: Some(0.0),
      weather_code: Some(61),
    }),
    ..WeatherPayload::default()
  }
}

pub fn new_observation(address: &str, time_utc: &str) -> NewObservation {
  let time_utc: DateTime<Utc> = time_utc.parse().expect("rfc3339 fixture");
  NewObservation {
    address: address.into(),
    temp_c: 10.0,
    temp_f: 50.0,
    relative_humidity: 50.0,
    rain: 0.0,
    snowfall: 0.0,
    weather_code: WeatherCode(0),
    timezone: "UTC".into(),
    time_utc,
    time_local: time_utc.fixed_offset(),
  }
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("memory store: injected {0} failure")]
pub struct MemoryError(&'static str);

#[derive(Default)]
pub struct MemoryStore {
  geolocations: Mutex<Vec<Geolocation>>,
  observations: Mutex<Vec<Observation>>,
  drawings:     Mutex<Vec<ObservationDrawing>>,
  fail_reads:   AtomicBool,
  fail_writes:  AtomicBool,
}

impl MemoryStore {
  pub fn fail_reads(&self) { self.fail_reads.store(true, Ordering::SeqCst); }

  pub fn fail_writes(&self) { self.fail_writes.store(true, Ordering::SeqCst); }

  pub fn seed_geolocation(&self, geolocation: Geolocation) {
    self.geolocations.lock().unwrap().push(geolocation);
  }

  pub fn geolocation_count(&self) -> usize { self.geolocations.lock().unwrap().len() }

  pub fn observation_count(&self) -> usize { self.observations.lock().unwrap().len() }

  /// Synchronous append, bypassing failure injection.
  pub fn record(&self, input: NewObservation) -> Observation {
    let mut observations = self.observations.lock().unwrap();
    let id = observations.len() as i64 + 1;
    let observation = input.into_observation(id);
    observations.push(observation.clone());
    observation
  }

  fn check_read(&self) -> Result<(), MemoryError> {
    if self.fail_reads.load(Ordering::SeqCst) { Err(MemoryError("read")) } else { Ok(()) }
  }

  fn check_write(&self) -> Result<(), MemoryError> {
    if self.fail_writes.load(Ordering::SeqCst) { Err(MemoryError("write")) } else { Ok(()) }
  }
}

impl ObservationStore for MemoryStore {
  type Error = MemoryError;

  async fn get_geolocation(&self, address: &str) -> Result<Option<Geolocation>, MemoryError> {
    self.check_read()?;
    let rows = self.geolocations.lock().unwrap();
    Ok(rows.iter().find(|g| g.address == address).cloned())
  }

  async fn insert_geolocation(&self, geolocation: Geolocation) -> Result<InsertOutcome, MemoryError> {
    self.check_write()?;
    let mut rows = self.geolocations.lock().unwrap();
    if rows.iter().any(|g| g.address == geolocation.address) {
      return Ok(InsertOutcome::AlreadyPresent);
    }
    rows.push(geolocation);
    Ok(InsertOutcome::Inserted)
  }

  async fn record_observation(&self, input: NewObservation) -> Result<Observation, MemoryError> {
    self.check_write()?;
    Ok(self.record(input))
  }

  async fn get_observation(&self, id: i64) -> Result<Option<Observation>, MemoryError> {
    self.check_read()?;
    let rows = self.observations.lock().unwrap();
    Ok(rows.iter().find(|o| o.id == id).cloned())
  }

  async fn prior_observation(&self, current: &Observation) -> Result<Option<Observation>, MemoryError> {
    self.check_read()?;
    let rows = self.observations.lock().unwrap();
    Ok(
      rows
        .iter()
        .filter(|o| o.address == current.address && o.time_utc < current.time_utc)
        .max_by(|a, b| a.time_utc.cmp(&b.time_utc).then(b.id.cmp(&a.id)))
        .cloned(),
    )
  }

  async fn attach_drawing(
    &self,
    observation_id: i64,
    drawing: NewDrawing,
  ) -> Result<Option<ObservationDrawing>, MemoryError> {
    self.check_write()?;
    if !self.observations.lock().unwrap().iter().any(|o| o.id == observation_id) {
      return Ok(None);
    }
    let row = ObservationDrawing {
      observation_id,
      size_bytes: drawing.size_bytes(),
      data_uri: drawing.data_uri,
      recorded_at: Utc::now(),
    };
    self.drawings.lock().unwrap().push(row.clone());
    Ok(Some(row))
  }
}

// ─── Providers ───────────────────────────────────────────────────────────────

pub struct FakeGeolocationProvider {
  payload: Option<GeolocationPayload>,
  delay:   Duration,
  queries: Mutex<Vec<String>>,
}

impl FakeGeolocationProvider {
  pub fn returning(payload: GeolocationPayload) -> Self {
    Self { payload: Some(payload), delay: Duration::ZERO, queries: Mutex::default() }
  }

  pub fn failing() -> Self {
    Self { payload: None, delay: Duration::ZERO, queries: Mutex::default() }
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  pub fn calls(&self) -> usize { self.queries.lock().unwrap().len() }

  pub fn queries(&self) -> Vec<String> { self.queries.lock().unwrap().clone() }
}

impl GeolocationProvider for FakeGeolocationProvider {
  async fn locate(&self, address: &str) -> Result<GeolocationPayload> {
    self.queries.lock().unwrap().push(address.to_owned());
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
    self
      .payload
      .clone()
      .ok_or_else(|| Error::ProviderUnavailable("connection refused".into()))
  }
}

pub struct FakeWeatherProvider {
  payload:     WeatherPayload,
  failures:    AtomicUsize,
  coordinates: Mutex<Vec<(f64, f64)>>,
}

impl FakeWeatherProvider {
  pub fn returning(payload: WeatherPayload) -> Self {
    Self { payload, failures: AtomicUsize::new(0), coordinates: Mutex::default() }
  }

  /// Fail the first `n` calls with `ProviderUnavailable`.
  pub fn failing_first(self, n: usize) -> Self {
    self.failures.store(n, Ordering::SeqCst);
    self
  }

  pub fn calls(&self) -> usize { self.coordinates.lock().unwrap().len() }

  pub fn coordinates(&self) -> Vec<(f64, f64)> { self.coordinates.lock().unwrap().clone() }
}

impl WeatherProvider for FakeWeatherProvider {
  async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherPayload> {
    self.coordinates.lock().unwrap().push((latitude, longitude));
    let remaining = self.failures.load(Ordering::SeqCst);
    if remaining > 0 {
      self.failures.store(remaining - 1, Ordering::SeqCst);
      return Err(Error::ProviderUnavailable("503 Service Unavailable".into()));
    }
    Ok(self.payload.clone())
  }
}
