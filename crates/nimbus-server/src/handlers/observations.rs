//! Handlers for `/observations/{id}`.
//!
//! | Method  | Path                 | Notes |
//! |---------|----------------------|-------|
//! | `GET`   | `/observations/{id}` | 404 if not found |
//! | `PATCH` | `/observations/{id}` | Form field `drawing` (a `data:image/...` URI); 201 + stored drawing |

use axum::{
  Form, Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use nimbus_core::{
  observation::{NewDrawing, Observation},
  provider::{GeolocationProvider, WeatherProvider},
  store::ObservationStore,
  validate::Validate as _,
};
use serde::Deserialize;

use crate::{AppState, error::Error};

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /observations/{id}`
pub async fn get_one<S, G, W>(
  State(state): State<AppState<S, G, W>>,
  Path(id): Path<i64>,
) -> Result<Json<Observation>, Error>
where
  S: ObservationStore + 'static,
  G: GeolocationProvider + 'static,
  W: WeatherProvider + 'static,
{
  let observation = state
    .store
    .get_observation(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;
  Ok(Json(observation))
}

// ─── Attach drawing ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DrawingForm {
  #[serde(default)]
  pub drawing: String,
}

/// `PATCH /observations/{id}` with form body `drawing=<data uri>`.
pub async fn attach_drawing<S, G, W>(
  State(state): State<AppState<S, G, W>>,
  Path(id): Path<i64>,
  Form(form): Form<DrawingForm>,
) -> Result<impl IntoResponse, Error>
where
  S: ObservationStore + 'static,
  G: GeolocationProvider + 'static,
  W: WeatherProvider + 'static,
{
  let drawing = NewDrawing { data_uri: form.drawing };
  drawing.validate().map_err(Error::InvalidDrawing)?;

  let stored = state
    .store
    .attach_drawing(id, drawing)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;

  tracing::info!(observation_id = id, size_bytes = stored.size_bytes, "attached drawing");
  Ok((StatusCode::CREATED, Json(stored)))
}
