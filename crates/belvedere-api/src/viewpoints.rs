//! Handlers for `/viewpoints` endpoints.
//!
//! Reads return [`ViewpointSummary`] — the viewpoint plus its derived
//! status, representative picture and last accepted capture date.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use belvedere_core::{
  actor::CapabilityCheck,
  annotate::PointAnnotator,
  store::ObservationStore,
  viewpoint::{NewViewpoint, Viewpoint, ViewpointId, ViewpointPatch},
  workflow::ViewpointSummary,
};

use crate::{AppState, caps::ActingAs, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// `?active=true` hides deactivated viewpoints.
  #[serde(default)]
  pub active: bool,
}

/// `GET /viewpoints[?active=true]`
pub async fn list<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ViewpointSummary>>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.list_viewpoints(params.active).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /viewpoints`
pub async fn create<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Json(body): Json<NewViewpoint>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let viewpoint = state.flow.create_viewpoint(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(viewpoint)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /viewpoints/:id`
pub async fn get_one<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  Path(id): Path<ViewpointId>,
) -> Result<Json<ViewpointSummary>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.get_viewpoint(id).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /viewpoints/:id` — partial patch; `"city": null` detaches the city.
pub async fn update<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<ViewpointId>,
  Json(patch): Json<ViewpointPatch>,
) -> Result<Json<Viewpoint>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.update_viewpoint(&actor, id, patch).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /viewpoints/:id` — cascades to the viewpoint's pictures.
pub async fn delete<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<ViewpointId>,
) -> Result<StatusCode, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  state.flow.delete_viewpoint(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
