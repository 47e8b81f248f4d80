//! Reconciling an observation instant with a location's IANA timezone.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Name recorded when a location's timezone cannot be resolved.
pub const FALLBACK_ZONE: &str = "UTC";

/// A recorded degradation: the requested zone was unknown, so UTC was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimezoneFallback {
  pub requested: String,
}

/// An instant expressed in a location's local time.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTime {
  /// The zone actually applied (`"UTC"` on fallback).
  pub zone:     String,
  pub time:     DateTime<FixedOffset>,
  pub fallback: Option<TimezoneFallback>,
}

/// Express `instant` in `timezone`, falling back to UTC for unknown or
/// malformed identifiers instead of failing.
pub fn localize(instant: DateTime<Utc>, timezone: &str) -> LocalTime {
  match timezone.parse::<Tz>() {
    Ok(tz) => LocalTime {
      zone:     tz.name().to_owned(),
      time:     instant.with_timezone(&tz).fixed_offset(),
      fallback: None,
    },
    Err(_) => {
      tracing::warn!(timezone, "unrecognised timezone; falling back to UTC");
      LocalTime {
        zone:     FALLBACK_ZONE.to_owned(),
        time:     instant.fixed_offset(),
        fallback: Some(TimezoneFallback { requested: timezone.to_owned() }),
      }
    }
  }
}
