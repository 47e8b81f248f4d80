//! HTTP layer for nimbus.
//!
//! Exposes an axum [`Router`] that resolves the caller's location and current
//! weather on `GET /`, backed by any [`ObservationStore`] and pair of
//! upstream providers.

pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use nimbus_core::{
  pipeline::Pipeline,
  provider::{GeolocationProvider, WeatherProvider},
  retry::RetryPolicy,
  store::ObservationStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{index, observations};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `NIMBUS_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  pub geolocation_base_url:  String,
  pub weather_base_url:      String,
  pub provider_timeout_secs: u64,
  /// Extra attempts after a provider reports itself unavailable.
  pub provider_retries:      u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  "127.0.0.1".to_string(),
      port:                  8080,
      store_path:            PathBuf::from("./db.sqlite"),
      geolocation_base_url:  nimbus_upstream::ipapi::DEFAULT_BASE_URL.to_string(),
      weather_base_url:      nimbus_upstream::openmeteo::DEFAULT_BASE_URL.to_string(),
      provider_timeout_secs: 10,
      provider_retries:      1,
    }
  }
}

impl ServerConfig {
  pub fn provider_timeout(&self) -> Duration {
    Duration::from_secs(self.provider_timeout_secs)
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy::default().with_max_retries(self.provider_retries)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, G, W> {
  pub pipeline: Arc<Pipeline<S, G, W>>,
  pub store:    Arc<S>,
}

impl<S, G, W> Clone for AppState<S, G, W> {
  fn clone(&self) -> Self {
    Self { pipeline: self.pipeline.clone(), store: self.store.clone() }
  }
}

impl<S, G, W> AppState<S, G, W>
where
  S: ObservationStore,
  G: GeolocationProvider,
  W: WeatherProvider,
{
  pub fn new(store: Arc<S>, geolocation: Arc<G>, weather: Arc<W>, retry: RetryPolicy) -> Self {
    let pipeline = Pipeline::new(store.clone(), geolocation, weather).with_retry(retry);
    Self { pipeline: Arc::new(pipeline), store }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`].
///
/// `GET /` reads the client address from [`axum::extract::ConnectInfo`], so
/// the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router<S, G, W>(state: AppState<S, G, W>) -> Router
where
  S: ObservationStore + 'static,
  G: GeolocationProvider + 'static,
  W: WeatherProvider + 'static,
{
  Router::new()
    .route("/",                  get(index::handler::<S, G, W>))
    .route(
      "/observations/{id}",
      get(observations::get_one::<S, G, W>).patch(observations::attach_drawing::<S, G, W>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
