use std::sync::Arc;

use serde::Serialize;

use crate::{Error, Result, observation::Observation, store::ObservationStore};

/// Outcome of a prior-observation lookup. A first visit is not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "observation", rename_all = "snake_case")]
pub enum PriorObservation {
  Found(Observation),
  FirstVisit,
}

impl PriorObservation {
  pub fn into_option(self) -> Option<Observation> {
    match self {
      Self::Found(obs) => Some(obs),
      Self::FirstVisit => None,
    }
  }
}

/// Finds the most recent observation captured before a given one at the same
/// location.
pub struct PriorObservationLocator<S> {
  store: Arc<S>,
}

impl<S: ObservationStore> PriorObservationLocator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn resolve_prior(&self, current: &Observation) -> Result<PriorObservation> {
    let prior = self
      .store
      .prior_observation(current)
      .await
      .map_err(Error::storage_read)?;
    Ok(match prior {
      Some(obs) => PriorObservation::Found(obs),
      None => PriorObservation::FirstVisit,
    })
  }
}
