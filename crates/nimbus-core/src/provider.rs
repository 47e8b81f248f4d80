//! Upstream collaborators: the geolocation and weather services.
//!
//! Implementations (e.g. `nimbus-upstream`) map transport failures and
//! non-success statuses to [`Error::ProviderUnavailable`] and undecodable
//! bodies to [`Error::ProviderInvalidResponse`]. Validation is left to the
//! resolvers.
//!
//! [`Error::ProviderUnavailable`]: crate::Error::ProviderUnavailable
//! [`Error::ProviderInvalidResponse`]: crate::Error::ProviderInvalidResponse

use std::future::Future;

use crate::{
  Result,
  payload::{GeolocationPayload, WeatherPayload},
};

pub trait GeolocationProvider: Send + Sync {
  /// Locate `address`. An empty address asks the provider to locate the
  /// caller's own public address.
  fn locate<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<GeolocationPayload>> + Send + 'a;
}

pub trait WeatherProvider: Send + Sync {
  /// Current conditions at the given coordinates.
  fn current(
    &self,
    latitude: f64,
    longitude: f64,
  ) -> impl Future<Output = Result<WeatherPayload>> + Send + '_;
}
