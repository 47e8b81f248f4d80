//! `GET /`: resolve the caller's location and current weather.

use std::net::SocketAddr;

use axum::{
  Json,
  extract::{ConnectInfo, State},
};
use nimbus_core::{
  pipeline::Report,
  provider::{GeolocationProvider, WeatherProvider},
  store::ObservationStore,
};

use crate::{AppState, error::Error};

pub async fn handler<S, G, W>(
  State(state): State<AppState<S, G, W>>,
  ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Result<Json<Report>, Error>
where
  S: ObservationStore + 'static,
  G: GeolocationProvider + 'static,
  W: WeatherProvider + 'static,
{
  // IPv4 clients on a dual-stack listener appear as `::ffff:a.b.c.d`.
  let address = remote.ip().to_canonical().to_string();
  let report = state.pipeline.resolve(&address).await?;
  Ok(Json(report))
}
