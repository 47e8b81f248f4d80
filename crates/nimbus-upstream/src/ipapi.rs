//! Client for the ip-api.com geolocation service.

use std::time::Duration;

use nimbus_core::{
  payload::{GEOLOCATION_FIELDS, GeolocationPayload},
  provider::GeolocationProvider,
};
use reqwest::{Client, Url};

use crate::http;

pub const DEFAULT_BASE_URL: &str = "http://ip-api.com";

const SERVICE: &str = "geolocation service";

/// `GET {base}/json/{address}?fields=...`
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct IpApiClient {
  client:   Client,
  base_url: Url,
}

impl IpApiClient {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
    let base_url = base_url.into();
    let parsed = Url::parse(&base_url)
      .map_err(|e| crate::Error::BaseUrl { url: base_url.clone(), reason: e.to_string() })?;
    if parsed.cannot_be_a_base() {
      return Err(crate::Error::BaseUrl { url: base_url, reason: "not a hierarchical URL".into() });
    }
    Ok(Self {
      client:   http::build_client(timeout)?,
      base_url: parsed,
    })
  }

  /// The address is pushed as a single percent-encoded path segment.
  fn url(&self, address: &str) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push("json").push(address);
    }
    url
  }
}

impl GeolocationProvider for IpApiClient {
  async fn locate(&self, address: &str) -> nimbus_core::Result<GeolocationPayload> {
    let url = self.url(address);
    tracing::debug!(%url, "locating address");

    let resp = self
      .client
      .get(url)
      .query(&[("fields", GEOLOCATION_FIELDS)])
      .send()
      .await
      .map_err(|e| http::unavailable(SERVICE, e))?;

    http::decode(SERVICE, resp).await
  }
}
