//! Client for the Open-Meteo forecast service.

use std::time::Duration;

use nimbus_core::{
  payload::{WEATHER_FIELDS, WeatherPayload},
  provider::WeatherProvider,
};
use reqwest::Client;

use crate::http;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const SERVICE: &str = "weather service";

/// `GET {base}/v1/forecast?current=...&latitude=..&longitude=..`
///
/// Coordinates are sent with two decimal places.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
  client:   Client,
  base_url: String,
}

impl OpenMeteoClient {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
    Ok(Self {
      client:   http::build_client(timeout)?,
      base_url: base_url.into(),
    })
  }

  fn url(&self) -> String {
    format!("{}/v1/forecast", self.base_url.trim_end_matches('/'))
  }
}

impl WeatherProvider for OpenMeteoClient {
  async fn current(&self, latitude: f64, longitude: f64) -> nimbus_core::Result<WeatherPayload> {
    let latitude = format!("{latitude:.2}");
    let longitude = format!("{longitude:.2}");
    tracing::debug!(%latitude, %longitude, "fetching current conditions");

    let resp = self
      .client
      .get(self.url())
      .query(&[
        ("current", WEATHER_FIELDS),
        ("latitude", latitude.as_str()),
        ("longitude", longitude.as_str()),
      ])
      .send()
      .await
      .map_err(|e| http::unavailable(SERVICE, e))?;

    http::decode(SERVICE, resp).await
  }
}
