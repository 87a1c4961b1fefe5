//! Picture — one photographic submission tied to a viewpoint and optionally
//! a campaign.
//!
//! The capture `date` is distinct from `created_at` (the upload timestamp):
//! identifier ranks are computed over capture dates, representative-picture
//! selection over creation time. The two orderings must never be conflated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  actor::ActorId,
  campaign::CampaignId,
  error::{Error, Result},
  viewpoint::ViewpointId,
};

pub type PictureId = i64;

// ─── State ───────────────────────────────────────────────────────────────────

/// Lifecycle state of a picture.
///
/// Legal transitions: `draft → submitted → accepted`,
/// `submitted → refused`, `refused → submitted`. Nothing leads out of
/// `accepted` short of an administrative override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PictureState {
  #[default]
  Draft,
  Submitted,
  Accepted,
  Refused,
}

impl PictureState {
  /// The discriminant string stored in the `state` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Draft => "draft",
      Self::Submitted => "submitted",
      Self::Accepted => "accepted",
      Self::Refused => "refused",
    }
  }

  /// Parse a state name. Anything outside the known set is a
  /// [`Error::Validation`] — filter values are never silently ignored.
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "draft" => Ok(Self::Draft),
      "submitted" => Ok(Self::Submitted),
      "accepted" => Ok(Self::Accepted),
      "refused" => Ok(Self::Refused),
      other => Err(Error::Validation(format!("unknown picture state: {other:?}"))),
    }
  }
}

// ─── Picture ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
  pub picture_id: PictureId,
  pub owner:      ActorId,
  pub viewpoint:  ViewpointId,
  /// Nulled if the campaign is deleted; the picture survives.
  pub campaign:   Option<CampaignId>,
  pub state:      PictureState,
  /// Permanent human-facing code, assigned exactly once the first time the
  /// picture reaches `accepted`, never recomputed afterwards.
  pub identifier: Option<i64>,
  /// Capture date — when the photograph was taken.
  pub date:       DateTime<Utc>,
  /// Upload timestamp, server-assigned.
  pub created_at: DateTime<Utc>,
  /// Reference to the stored image file; rendering is out of scope.
  pub file:       String,
  pub properties: serde_json::Value,
}

/// Input to picture creation. Owner, campaign and final state are decided by
/// the workflow engine, not taken from the caller verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPicture {
  pub viewpoint:  ViewpointId,
  pub campaign:   Option<CampaignId>,
  /// Requested initial state; subject to role rules and the workflow toggle.
  pub state:      Option<PictureState>,
  /// Only honoured for picture managers; defaults to the acting manager.
  pub owner:      Option<ActorId>,
  pub date:       DateTime<Utc>,
  pub file:       String,
  #[serde(default)]
  pub properties: serde_json::Value,
}

/// A partial update to a picture. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PicturePatch {
  pub state:      Option<PictureState>,
  pub date:       Option<DateTime<Utc>>,
  pub file:       Option<String>,
  pub properties: Option<serde_json::Value>,
  /// Manager-only: reassign ownership.
  pub owner:      Option<ActorId>,
  /// Manager-only: attach (`Some(Some(id))`), detach (`Some(None)`), or
  /// leave (`None`) the campaign.
  #[serde(default, deserialize_with = "crate::serde_ext::double_option")]
  pub campaign:   Option<Option<CampaignId>>,
}

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Assemble the permanent picture identifier from the global observatory id,
/// the owning viewpoint's numeric id and the picture's 1-based rank among the
/// viewpoint's pictures ordered by capture date ascending.
///
/// Format: `{observatory_id}0{viewpoint_id:03}{rank:02}`, read as an integer.
pub fn picture_identifier(
  observatory_id: u32,
  viewpoint_id: ViewpointId,
  rank: usize,
) -> Result<i64> {
  let formatted = format!("{observatory_id}0{viewpoint_id:03}{rank:02}");
  formatted
    .parse()
    .map_err(|_| Error::Validation(format!("identifier overflow: {formatted}")))
}
