//! Error types for `nimbus-core`.

use thiserror::Error;

use crate::validate::Problems;

/// A type-erased error raised by a storage backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport failure or non-success HTTP status from an upstream service.
  #[error("provider unavailable: {0}")]
  ProviderUnavailable(String),

  /// The upstream body could not be decoded.
  #[error("provider returned an invalid response: {0}")]
  ProviderInvalidResponse(String),

  /// The upstream body decoded but is missing required fields.
  #[error("provider payload failed validation: {0}")]
  InvalidPayload(Problems),

  #[error("storage read failed: {0}")]
  StorageRead(#[source] BoxError),

  #[error("storage write failed: {0}")]
  StorageWrite(#[source] BoxError),
}

impl Error {
  /// Only transport-level failures are retried.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::ProviderUnavailable(_))
  }

  /// `true` for both decode failures and validation failures.
  pub fn is_invalid_response(&self) -> bool {
    matches!(self, Self::ProviderInvalidResponse(_) | Self::InvalidPayload(_))
  }

  pub(crate) fn storage_read<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageRead(Box::new(e))
  }

  pub(crate) fn storage_write<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageWrite(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
