//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed nanosecond width so
//! that lexical order on `time_utc` matches chronological order.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use nimbus_core::observation::{Observation, WeatherCode};

use crate::{Error, Result};

// ─── DateTime ────────────────────────────────────────────────────────────────

pub fn encode_utc(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_utc(s: &str) -> Result<DateTime<Utc>> {
  decode_fixed(s).map(|dt| dt.with_timezone(&Utc))
}

pub fn encode_fixed(dt: DateTime<FixedOffset>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, false)
}

pub fn decode_fixed(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every observation `SELECT`, in [`RawObservation`]
/// field order.
pub const OBSERVATION_COLUMNS: &str = "id, geolocation_ref, temp_c, temp_f, \
  relative_humidity, rain, snowfall, weather_code, timezone, time_utc, time_local";

/// Raw values read directly from an `observation` row.
pub struct RawObservation {
  pub id:                i64,
  pub geolocation_ref:   String,
  pub temp_c:            f64,
  pub temp_f:            f64,
  pub relative_humidity: f64,
  pub rain:              f64,
  pub snowfall:          f64,
  pub weather_code:      i32,
  pub timezone:          String,
  pub time_utc:          String,
  pub time_local:        String,
}

impl RawObservation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      geolocation_ref:   row.get(1)?,
      temp_c:            row.get(2)?,
      temp_f:            row.get(3)?,
      relative_humidity: row.get(4)?,
      rain:              row.get(5)?,
      snowfall:          row.get(6)?,
      weather_code:      row.get(7)?,
      timezone:          row.get(8)?,
      time_utc:          row.get(9)?,
      time_local:        row.get(10)?,
    })
  }

  pub fn into_observation(self) -> Result<Observation> {
    Ok(Observation {
      id:                self.id,
      address:           self.geolocation_ref,
      temp_c:            self.temp_c,
      temp_f:            self.temp_f,
      relative_humidity: self.relative_humidity,
      rain:              self.rain,
      snowfall:          self.snowfall,
      weather_code:      WeatherCode(self.weather_code),
      timezone:          self.timezone,
      time_utc:          decode_utc(&self.time_utc)?,
      time_local:        decode_fixed(&self.time_local)?,
    })
  }
}
