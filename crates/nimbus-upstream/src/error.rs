//! Error type for `nimbus-upstream` construction.
//!
//! Request-time failures are reported as [`nimbus_core::Error`]; this type
//! only covers building a client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),

  #[error("invalid base URL {url:?}: {reason}")]
  BaseUrl { url: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
