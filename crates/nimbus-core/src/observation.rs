//! Weather observations and the drawings users attach to them.
//!
//! Observations are append-only: every resolution produces a new row, and a
//! stored row is never modified.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{Problems, Validate};

// ─── WeatherCode ─────────────────────────────────────────────────────────────

/// A WMO present-weather code. Stored and returned as-is; unknown values are
/// never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub i32);

impl WeatherCode {
  /// Human-readable description per the WMO interpretation table.
  pub fn description(self) -> &'static str {
    match self.0 {
      0 => "Clear sky",
      1 => "Mainly clear",
      2 => "Partly cloudy",
      3 => "Overcast",
      45 => "Fog",
      48 => "Depositing rime fog",
      51 => "Light drizzle",
      53 => "Moderate drizzle",
      55 => "Dense drizzle",
      56 => "Light freezing drizzle",
      57 => "Dense freezing drizzle",
      61 => "Slight rain",
      63 => "Moderate rain",
      65 => "Heavy rain",
      66 => "Light freezing rain",
      67 => "Heavy freezing rain",
      71 => "Slight snow fall",
      73 => "Moderate snow fall",
      75 => "Heavy snow fall",
      77 => "Snow grains",
      80 => "Slight rain showers",
      81 => "Moderate rain showers",
      82 => "Violent rain showers",
      85 => "Slight snow showers",
      86 => "Heavy snow showers",
      95 => "Thunderstorm",
      96 => "Thunderstorm with slight hail",
      99 => "Thunderstorm with heavy hail",
      _ => "Unknown",
    }
  }
}

// ─── Observation ─────────────────────────────────────────────────────────────

/// A persisted reading. `id` is assigned by the store and increases
/// monotonically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  pub id:                i64,
  /// Address of the geolocation that produced this observation.
  pub address:           String,
  pub temp_c:            f64,
  /// Always derived from `temp_c`.
  pub temp_f:            f64,
  /// Percent.
  pub relative_humidity: f64,
  /// Millimetres.
  pub rain:              f64,
  /// Centimetres.
  pub snowfall:          f64,
  pub weather_code:      WeatherCode,
  /// The zone `time_local` is expressed in; `"UTC"` after a fallback.
  pub timezone:          String,
  pub time_utc:          DateTime<Utc>,
  pub time_local:        DateTime<FixedOffset>,
}

/// Input to [`crate::store::ObservationStore::record_observation`].
/// The `id` is always assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewObservation {
  pub address:           String,
  pub temp_c:            f64,
  pub temp_f:            f64,
  pub relative_humidity: f64,
  pub rain:              f64,
  pub snowfall:          f64,
  pub weather_code:      WeatherCode,
  pub timezone:          String,
  pub time_utc:          DateTime<Utc>,
  pub time_local:        DateTime<FixedOffset>,
}

impl NewObservation {
  pub fn into_observation(self, id: i64) -> Observation {
    Observation {
      id,
      address: self.address,
      temp_c: self.temp_c,
      temp_f: self.temp_f,
      relative_humidity: self.relative_humidity,
      rain: self.rain,
      snowfall: self.snowfall,
      weather_code: self.weather_code,
      timezone: self.timezone,
      time_utc: self.time_utc,
      time_local: self.time_local,
    }
  }
}

// ─── Drawings ────────────────────────────────────────────────────────────────

/// A user annotation attached to an existing observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationDrawing {
  pub observation_id: i64,
  pub data_uri:       String,
  pub size_bytes:     i64,
  /// Server-assigned.
  pub recorded_at:    DateTime<Utc>,
}

/// A drawing submitted by a client, before it is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrawing {
  pub data_uri: String,
}

impl NewDrawing {
  pub fn size_bytes(&self) -> i64 { self.data_uri.len() as i64 }
}

impl Validate for NewDrawing {
  fn validate(&self) -> Result<(), Problems> {
    let mut problems = Problems::new();
    problems.require_text("drawing", Some(&self.data_uri));
    if problems.is_empty() {
      let is_image = self.data_uri.starts_with("data:image/");
      let has_body = self
        .data_uri
        .split_once(',')
        .is_some_and(|(_, body)| !body.is_empty());
      if !is_image || !has_body {
        problems.insert("drawing", "expected a data:image/... URI");
      }
    }
    problems.into_result()
  }
}
