//! Handlers for the `/cities` and `/themes` lookup endpoints.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use belvedere_core::{
  actor::CapabilityCheck,
  annotate::PointAnnotator,
  lookup::{City, Theme},
  store::ObservationStore,
};

use crate::{AppState, caps::ActingAs, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LabelBody {
  pub label: String,
}

/// `GET /cities`
pub async fn list_cities<S, C, A>(
  State(state): State<AppState<S, C, A>>,
) -> Result<Json<Vec<City>>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let cities = state
    .flow
    .store()
    .list_cities()
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(cities))
}

/// `POST /cities` — body `{"label": "marseille"}`; resolves or creates the
/// canonical capitalized form.
pub async fn create_city<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Json(body): Json<LabelBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let city = state.flow.create_city(&actor, &body.label).await?;
  Ok((StatusCode::CREATED, Json(city)))
}

/// `GET /themes`
pub async fn list_themes<S, C, A>(
  State(state): State<AppState<S, C, A>>,
) -> Result<Json<Vec<Theme>>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let themes = state
    .flow
    .store()
    .list_themes()
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(themes))
}

/// `POST /themes`
pub async fn create_theme<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Json(body): Json<LabelBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let theme = state.flow.create_theme(&actor, &body.label).await?;
  Ok((StatusCode::CREATED, Json(theme)))
}
