//! Handlers for `/campaigns` endpoints.
//!
//! Listing and detail visibility are role-scoped by the engine: campaign
//! managers see everything, photographers only their assigned non-draft
//! campaigns.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use belvedere_core::{
  actor::CapabilityCheck,
  annotate::PointAnnotator,
  campaign::{
    Campaign, CampaignId, CampaignState, CampaignStatistics, NewCampaign,
  },
  store::ObservationStore,
};

use crate::{AppState, caps::ActingAs, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /campaigns`
pub async fn list<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
) -> Result<Json<Vec<Campaign>>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.list_campaigns(&actor).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /campaigns`
pub async fn create<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Json(body): Json<NewCampaign>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let campaign = state.flow.create_campaign(&actor, body).await?;
  Ok((StatusCode::CREATED, Json(campaign)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// A campaign with its aggregate coverage statistics embedded.
#[derive(Debug, Serialize)]
pub struct CampaignDetail {
  #[serde(flatten)]
  pub campaign:   Campaign,
  pub statistics: CampaignStatistics,
}

/// `GET /campaigns/:id`
pub async fn get_one<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<CampaignId>,
) -> Result<Json<CampaignDetail>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  let campaign = state.flow.get_campaign(&actor, id).await?;
  let statistics = state.flow.campaign_statistics(id).await?;
  Ok(Json(CampaignDetail { campaign, statistics }))
}

// ─── State override ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetStateBody {
  pub state: CampaignState,
}

/// `PUT /campaigns/:id/state` — administrative override, including reopening
/// a closed campaign.
pub async fn set_state<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<CampaignId>,
  Json(body): Json<SetStateBody>,
) -> Result<Json<Campaign>, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Ok(Json(state.flow.set_campaign_state(&actor, id, body.state).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /campaigns/:id` — pictures survive with their campaign detached.
pub async fn delete<S, C, A>(
  State(state): State<AppState<S, C, A>>,
  ActingAs(actor): ActingAs,
  Path(id): Path<CampaignId>,
) -> Result<StatusCode, ApiError>
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  state.flow.delete_campaign(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
