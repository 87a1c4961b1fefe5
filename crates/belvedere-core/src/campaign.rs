//! Campaign — a time-bounded assignment of a set of viewpoints to one
//! photographer — and the aggregate coverage statistics derived from it.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  actor::ActorId,
  error::{Error, Result},
  picture::{Picture, PictureState},
  viewpoint::ViewpointId,
};

pub type CampaignId = i64;

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignState {
  #[default]
  Draft,
  Started,
  Closed,
}

impl CampaignState {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Draft => "draft",
      Self::Started => "started",
      Self::Closed => "closed",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "draft" => Ok(Self::Draft),
      "started" => Ok(Self::Started),
      "closed" => Ok(Self::Closed),
      other => {
        Err(Error::Validation(format!("unknown campaign state: {other:?}")))
      }
    }
  }
}

// ─── Campaign ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
  pub campaign_id: CampaignId,
  pub created_at:  DateTime<Utc>,
  pub label:       String,
  pub start_date:  NaiveDate,
  pub owner:       ActorId,
  /// The photographer responsible for shooting the campaign's viewpoints.
  pub assignee:    ActorId,
  pub state:       CampaignState,
}

/// Input to campaign creation. Owner is the acting campaign manager.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
  pub label:      String,
  pub start_date: NaiveDate,
  pub assignee:   ActorId,
  #[serde(default)]
  pub state:      CampaignState,
  /// The set of viewpoints to photograph.
  #[serde(default)]
  pub viewpoints: Vec<ViewpointId>,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Coverage counts over a campaign's viewpoint set.
///
/// Each assigned viewpoint carries at most one picture per campaign, so the
/// submitted/accepted buckets are disjoint and
/// `submitted + accepted + missing == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStatistics {
  /// Distinct viewpoints assigned to the campaign.
  pub total:     usize,
  /// Viewpoints with a picture awaiting review.
  pub submitted: usize,
  /// Viewpoints with an accepted picture.
  pub accepted:  usize,
  /// Everything else: draft, refused, or no picture at all.
  pub missing:   usize,
}

impl CampaignStatistics {
  /// Recompute from scratch over the campaign's current viewpoint set and
  /// picture set. Pictures for viewpoints no longer assigned are ignored.
  pub fn compute(viewpoints: &[ViewpointId], pictures: &[Picture]) -> Self {
    let assigned: HashSet<ViewpointId> = viewpoints.iter().copied().collect();

    let mut submitted: HashSet<ViewpointId> = HashSet::new();
    let mut accepted: HashSet<ViewpointId> = HashSet::new();
    for picture in pictures {
      if !assigned.contains(&picture.viewpoint) {
        continue;
      }
      match picture.state {
        PictureState::Submitted => {
          submitted.insert(picture.viewpoint);
        }
        PictureState::Accepted => {
          accepted.insert(picture.viewpoint);
        }
        PictureState::Draft | PictureState::Refused => {}
      }
    }

    let total = assigned.len();
    Self {
      total,
      submitted: submitted.len(),
      accepted: accepted.len(),
      missing: total - submitted.len() - accepted.len(),
    }
  }

  /// Whether every assigned viewpoint has an accepted picture. An empty
  /// viewpoint set never counts as complete.
  pub fn is_complete(&self) -> bool {
    self.total > 0 && self.accepted == self.total
  }
}
