//! Decoded upstream payloads and their validation.
//!
//! Every field is optional on the wire so that absence can be told apart from
//! a legitimate zero. Validation decides which absences are fatal.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone as _, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  geolocation::Geolocation,
  observation::WeatherCode,
  validate::{Problems, Validate},
};

// ─── Geolocation ─────────────────────────────────────────────────────────────

/// Fields requested from the geolocation service.
pub const GEOLOCATION_FIELDS: &str =
  "status,message,country,countryCode,region,regionName,city,zip,lat,lon,timezone,query";

/// Status value the geolocation service uses for a successful lookup.
pub const STATUS_SUCCESS: &str = "success";

/// The geolocation service's response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationPayload {
  pub query:        Option<String>,
  pub status:       Option<String>,
  /// Only present when `status` is `"fail"`.
  pub message:      Option<String>,
  pub country:      Option<String>,
  pub country_code: Option<String>,
  pub region:       Option<String>,
  pub region_name:  Option<String>,
  pub city:         Option<String>,
  pub zip:          Option<String>,
  pub lat:          Option<f64>,
  pub lon:          Option<f64>,
  pub timezone:     Option<String>,
}

impl Validate for GeolocationPayload {
  fn validate(&self) -> Result<(), Problems> {
    let mut problems = Problems::new();

    match self.status.as_deref() {
      Some(STATUS_SUCCESS) => {}
      Some(other) if !other.trim().is_empty() => problems.insert(
        "status",
        format!(
          "provider reported {other:?}: {}",
          self.message.as_deref().unwrap_or("no message")
        ),
      ),
      other => problems.require_text("status", other),
    }

    problems.require_text("country", self.country.as_deref());
    problems.require_text("countryCode", self.country_code.as_deref());
    problems.require_text("region", self.region.as_deref());
    problems.require_text("regionName", self.region_name.as_deref());
    problems.require_text("city", self.city.as_deref());
    problems.require_text("zip", self.zip.as_deref());
    problems.require_text("timezone", self.timezone.as_deref());
    problems.require_text("query", self.query.as_deref());

    problems.require("lat", self.lat);
    problems.require("lon", self.lon);
    problems.check_range("lat", self.lat, -90.0, 90.0);
    problems.check_range("lon", self.lon, -180.0, 180.0);

    // The provider reports (0, 0) when it has no fix at all.
    if self.lat == Some(0.0) && self.lon == Some(0.0) {
      problems.insert("lat", "zero coordinate pair treated as missing");
      problems.insert("lon", "zero coordinate pair treated as missing");
    }

    problems.into_result()
  }
}

impl GeolocationPayload {
  /// Validate and convert into the record stored for `address`.
  pub fn into_geolocation(
    self,
    address: impl Into<String>,
  ) -> Result<Geolocation, Problems> {
    self.validate()?;
    Ok(Geolocation {
      address:   address.into(),
      latitude:  self.lat.unwrap_or_default(),
      longitude: self.lon.unwrap_or_default(),
      city:      self.city.unwrap_or_default(),
      country:   self.country.unwrap_or_default(),
      region:    self.region_name.unwrap_or_default(),
      timezone:  self.timezone.unwrap_or_default(),
    })
  }
}

// ─── Weather ─────────────────────────────────────────────────────────────────

/// Current-condition variables requested from the weather service.
pub const WEATHER_FIELDS: &str =
  "temperature_2m,relative_humidity_2m,rain,showers,snowfall,weather_code";

/// Units the weather service reports for each current-condition variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUnits {
  pub time:                 Option<String>,
  pub interval:             Option<String>,
  pub temperature_2m:       Option<String>,
  pub relative_humidity_2m: Option<String>,
  pub rain:                 Option<String>,
  pub showers:              Option<String>,
  pub snowfall:             Option<String>,
  pub weather_code:         Option<String>,
}

/// The `current` block of a weather response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
  /// Local date-time without offset, e.g. `2024-01-15T12:00`.
  pub time:                 Option<String>,
  /// Seconds covered by the accumulation fields.
  pub interval:             Option<i64>,
  /// Celsius.
  pub temperature_2m:       Option<f64>,
  pub relative_humidity_2m: Option<f64>,
  pub rain:                 Option<f64>,
  pub showers:              Option<f64>,
  pub snowfall:             Option<f64>,
  pub weather_code:         Option<i32>,
}

/// The weather service's response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
  pub latitude:              Option<f64>,
  pub longitude:             Option<f64>,
  #[serde(alias = "generationtime_ms")]
  pub generation_time_ms:    Option<f64>,
  pub utc_offset_seconds:    Option<i32>,
  pub timezone:              Option<String>,
  pub timezone_abbreviation: Option<String>,
  pub elevation:             Option<f64>,
  pub current_units:         Option<CurrentUnits>,
  pub current:               Option<CurrentConditions>,
}

/// A validated current-conditions reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
  pub temperature_c:     f64,
  pub relative_humidity: f64,
  pub rain:              f64,
  pub snowfall:          f64,
  pub weather_code:      WeatherCode,
  pub captured_at:       DateTime<Utc>,
}

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

impl WeatherPayload {
  /// The capture instant of `current`, interpreted at `utc_offset_seconds`
  /// (zero when absent, which is what the service uses by default).
  pub fn captured_at(&self) -> Option<DateTime<Utc>> {
    let raw = self.current.as_ref()?.time.as_deref()?;
    let naive = TIME_FORMATS
      .iter()
      .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;
    let offset = FixedOffset::east_opt(self.utc_offset_seconds.unwrap_or(0))?;
    offset
      .from_local_datetime(&naive)
      .single()
      .map(|dt| dt.with_timezone(&Utc))
  }

  /// Validate and extract the fields an observation is built from.
  pub fn into_reading(self) -> Result<Reading, Problems> {
    self.validate()?;
    let captured_at = self.captured_at();
    let current = self.current.unwrap_or_default();
    match captured_at {
      Some(captured_at) => Ok(Reading {
        temperature_c: current.temperature_2m.unwrap_or_default(),
        relative_humidity: current.relative_humidity_2m.unwrap_or_default(),
        rain: current.rain.unwrap_or_default(),
        snowfall: current.snowfall.unwrap_or_default(),
        weather_code: WeatherCode(current.weather_code.unwrap_or_default()),
        captured_at,
      }),
      None => {
        let mut problems = Problems::new();
        problems.insert("current.time", "unparseable time");
        Err(problems)
      }
    }
  }
}

impl Validate for WeatherPayload {
  fn validate(&self) -> Result<(), Problems> {
    let mut problems = Problems::new();

    problems.check_range("latitude", self.latitude, -90.0, 90.0);
    problems.check_range("longitude", self.longitude, -180.0, 180.0);

    let Some(current) = &self.current else {
      problems.insert("current", "missing value");
      return problems.into_result();
    };

    problems.require_text("current.time", current.time.as_deref());
    if current.time.is_some() && self.captured_at().is_none() {
      problems.insert("current.time", "unparseable time");
    }

    problems.require("current.temperature_2m", current.temperature_2m);
    problems.require("current.relative_humidity_2m", current.relative_humidity_2m);
    problems.check_range(
      "current.relative_humidity_2m",
      current.relative_humidity_2m,
      0.0,
      100.0,
    );
    problems.require("current.weather_code", current.weather_code);

    problems.require("current.rain", current.rain);
    problems.require("current.snowfall", current.snowfall);
    for (field, value) in [
      ("current.rain", current.rain),
      ("current.showers", current.showers),
      ("current.snowfall", current.snowfall),
    ] {
      if value.is_some_and(|v| v < 0.0) {
        problems.insert(field, "negative accumulation");
      }
    }

    problems.into_result()
  }
}
