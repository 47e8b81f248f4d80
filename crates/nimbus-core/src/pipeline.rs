//! End-to-end resolution of one client request.

use std::sync::Arc;

use serde::Serialize;

use crate::{
  Result,
  geolocation::Geolocation,
  observation::Observation,
  provider::{GeolocationProvider, WeatherProvider},
  resolve::{GeolocationResolver, ObservationResolver, PriorObservationLocator},
  retry::RetryPolicy,
  store::ObservationStore,
  timezone::TimezoneFallback,
};

/// Everything resolved for a single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub location:          Geolocation,
  pub observation:       Observation,
  /// `None` on a first visit.
  pub prior:             Option<Observation>,
  /// Present when local time fell back to UTC.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timezone_fallback: Option<TimezoneFallback>,
}

/// Sequences geolocation, observation, and prior-observation resolution over
/// one shared store.
pub struct Pipeline<S, G, W> {
  geolocations: GeolocationResolver<S, G>,
  observations: ObservationResolver<S, W>,
  prior:        PriorObservationLocator<S>,
}

impl<S, G, W> Pipeline<S, G, W>
where
  S: ObservationStore,
  G: GeolocationProvider,
  W: WeatherProvider,
{
  pub fn new(store: Arc<S>, geolocation: Arc<G>, weather: Arc<W>) -> Self {
    Self {
      geolocations: GeolocationResolver::new(store.clone(), geolocation),
      observations: ObservationResolver::new(store.clone(), weather),
      prior:        PriorObservationLocator::new(store),
    }
  }

  /// Apply `retry` to both provider calls.
  pub fn with_retry(self, retry: RetryPolicy) -> Self {
    Self {
      geolocations: self.geolocations.with_retry(retry),
      observations: self.observations.with_retry(retry),
      prior:        self.prior,
    }
  }

  /// Resolve `address` to a location, record a fresh observation there, and
  /// find the observation before it.
  ///
  /// Dropping the returned future abandons any in-flight provider call; no
  /// row is written for a stage that has not completed.
  pub async fn resolve(&self, address: &str) -> Result<Report> {
    let location = self.geolocations.resolve(address).await?;
    let recorded = self.observations.resolve(&location).await?;
    let observation = recorded.observation;
    let prior = self.prior.resolve_prior(&observation).await?.into_option();
    Ok(Report { location, observation, prior, timezone_fallback: recorded.timezone_fallback })
  }
}
