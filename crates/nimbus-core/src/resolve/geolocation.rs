use std::sync::Arc;

use crate::{
  Error, Result,
  geolocation::{Geolocation, provider_query},
  provider::GeolocationProvider,
  retry::RetryPolicy,
  store::{InsertOutcome, ObservationStore},
};

/// Cache-aside resolution of client addresses.
///
/// Concurrent first-time lookups for the same address are not deduplicated
/// in process: each may call the provider. The store's per-address
/// uniqueness decides which write lands; losers re-read the winner's row.
pub struct GeolocationResolver<S, P> {
  store:    Arc<S>,
  provider: Arc<P>,
  retry:    RetryPolicy,
}

impl<S, P> GeolocationResolver<S, P>
where
  S: ObservationStore,
  P: GeolocationProvider,
{
  pub fn new(store: Arc<S>, provider: Arc<P>) -> Self {
    Self { store, provider, retry: RetryPolicy::none() }
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  /// Return the stored geolocation for `address`, fetching and persisting it
  /// on first sight.
  #[tracing::instrument(skip(self))]
  pub async fn resolve(&self, address: &str) -> Result<Geolocation> {
    if let Some(hit) = self.read(address).await? {
      tracing::debug!("geolocation cache hit");
      return Ok(hit);
    }
    tracing::debug!("geolocation cache miss");

    let query = provider_query(address);
    let payload = self
      .retry
      .run("geolocation", || self.provider.locate(query))
      .await?;
    let geolocation = payload
      .into_geolocation(address)
      .map_err(Error::InvalidPayload)?;

    let outcome = self
      .store
      .insert_geolocation(geolocation.clone())
      .await
      .map_err(Error::storage_write)?;

    match outcome {
      InsertOutcome::Inserted => {
        tracing::info!(
          city = %geolocation.city,
          country = %geolocation.country,
          "cached new geolocation"
        );
        Ok(geolocation)
      }
      InsertOutcome::AlreadyPresent => {
        tracing::debug!("lost insert race; using stored geolocation");
        self.read(address).await?.ok_or_else(|| {
          Error::StorageRead("geolocation missing after insert conflict".into())
        })
      }
    }
  }

  async fn read(&self, address: &str) -> Result<Option<Geolocation>> {
    self
      .store
      .get_geolocation(address)
      .await
      .map_err(Error::storage_read)
  }
}
