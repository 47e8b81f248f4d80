//! Shared request plumbing for the upstream clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("nimbus/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration) -> crate::Result<Client> {
  Ok(
    Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()?,
  )
}

/// Map a transport failure to `ProviderUnavailable`.
pub fn unavailable(service: &str, e: reqwest::Error) -> nimbus_core::Error {
  let kind = if e.is_timeout() { "timed out" } else { "request failed" };
  nimbus_core::Error::ProviderUnavailable(format!("{service} {kind}: {e}"))
}

/// Check the status and decode the body as JSON.
///
/// Non-success statuses are `ProviderUnavailable`; a body that cannot be
/// decoded is `ProviderInvalidResponse`.
pub async fn decode<T: DeserializeOwned>(
  service: &str,
  resp: Response,
) -> nimbus_core::Result<T> {
  let status = resp.status();
  if !status.is_success() {
    return Err(nimbus_core::Error::ProviderUnavailable(format!(
      "{service} returned {status}"
    )));
  }

  let body = resp.bytes().await.map_err(|e| unavailable(service, e))?;
  serde_json::from_slice(&body).map_err(|e| {
    nimbus_core::Error::ProviderInvalidResponse(format!("{service} body: {e}"))
  })
}
