use std::sync::Arc;

use chrono::Utc;

use crate::{
  Error, Result,
  geolocation::Geolocation,
  observation::{NewObservation, Observation},
  provider::WeatherProvider,
  retry::RetryPolicy,
  store::ObservationStore,
  timezone::{self, TimezoneFallback},
  units,
};

/// A freshly appended observation, with any degradation applied while
/// recording it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedObservation {
  pub observation:       Observation,
  /// Set when the location's timezone was unknown and UTC was used.
  pub timezone_fallback: Option<TimezoneFallback>,
}

/// Fetch-and-persist resolution of current weather.
///
/// Never served from cache: every call hits the weather provider and appends
/// a new observation. The observation is stamped with the server's clock at
/// capture; the provider's own reading time only names the start of its
/// reporting interval.
pub struct ObservationResolver<S, W> {
  store:    Arc<S>,
  provider: Arc<W>,
  retry:    RetryPolicy,
}

impl<S, W> ObservationResolver<S, W>
where
  S: ObservationStore,
  W: WeatherProvider,
{
  pub fn new(store: Arc<S>, provider: Arc<W>) -> Self {
    Self { store, provider, retry: RetryPolicy::none() }
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  #[tracing::instrument(skip_all, fields(address = %geolocation.address))]
  pub async fn resolve(&self, geolocation: &Geolocation) -> Result<RecordedObservation> {
    let (lat, lon) = (geolocation.latitude, geolocation.longitude);
    let payload = self
      .retry
      .run("weather", || self.provider.current(lat, lon))
      .await?;

    if let Some(reported) = payload.timezone.as_deref()
      && reported != "GMT"
      && reported != geolocation.timezone
    {
      tracing::debug!(
        reported,
        stored = %geolocation.timezone,
        "weather provider timezone differs from geolocation"
      );
    }

    let reading = payload.into_reading().map_err(Error::InvalidPayload)?;
    let captured_at = Utc::now();
    tracing::debug!(provider_time = %reading.captured_at, %captured_at, "captured reading");
    let local = timezone::localize(captured_at, &geolocation.timezone);

    let temp_c = units::round2(reading.temperature_c);
    let input = NewObservation {
      address: geolocation.address.clone(),
      temp_c,
      temp_f: units::c_to_f(temp_c),
      relative_humidity: reading.relative_humidity,
      rain: reading.rain,
      snowfall: reading.snowfall,
      weather_code: reading.weather_code,
      timezone: local.zone,
      time_utc: captured_at,
      time_local: local.time,
    };

    let observation = self
      .store
      .record_observation(input)
      .await
      .map_err(Error::storage_write)?;

    tracing::info!(
      id = observation.id,
      temp_c = observation.temp_c,
      conditions = observation.weather_code.description(),
      timezone_fallback = local.fallback.is_some(),
      "recorded observation"
    );
    Ok(RecordedObservation { observation, timezone_fallback: local.fallback })
  }
}
