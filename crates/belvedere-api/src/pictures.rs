//! Handlers for `/pictures` endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/pictures`      | Filters: `viewpoint_id`, `campaign_id`, `state`, `owner` |
//! | `POST`   | `/pictures`      | Role-gated; photographers go through campaign resolution |
//! | `GET`    | `/pictures/:id`  | 404 if not found |
//! | `PUT`    | `/pictures/:id`  | Partial patch; role rules apply |
//! | `DELETE` | `/pictures/:id`  | Cascades aggregate and thumbnail refresh |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use belvedere_core::{
  actor::CapabilityCheck,
  annotate::PointAnnotator,
  picture::{NewPicture, Picture, PictureId, PicturePatch, PictureState},
  store::{ObservationStore, PictureFilter},
};

use crate::{AppState, caps::ActingAs, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub viewpoint_id: Option<i64>,
  pub campaign_id:  Option<i64>,
  /// Unknown state names are a 400, never silently ignored.
  pub state:        Option<String>,
  pub owner:        Option<Uuid>,
}

/// `GET /pictures[?viewpoint_id=..&campaign_id=..&state=..&owner=..]`
pub async fn list<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Picture>>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let state_filter = params
    .state
    .as_deref()
    .map(PictureState::parse)
    .transpose()?;

  let pictures = state
    .flow
    .store()
    .list_pictures(PictureFilter {
      viewpoint: params.viewpoint_id,
      campaign:  params.campaign_id,
      state:     state_filter,
      owner:     params.owner,
    })
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(pictures))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /pictures`
pub async fn create<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Json(body): Json<NewPicture>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let picture = state.flow.create_picture(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(picture)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /pictures/:id`
pub async fn get_one<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  Path(id): Path<PictureId>,
) -> Result<Json<Picture>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.get_picture(id).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /pictures/:id` — partial patch.
pub async fn update<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<PictureId>,
  Json(patch): Json<PicturePatch>,
) -> Result<Json<Picture>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.update_picture(&actor, id, patch).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /pictures/:id`
pub async fn delete<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<PictureId>,
) -> Result<StatusCode, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  state.flow.delete_picture(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
