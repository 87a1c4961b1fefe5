//! Viewpoint — a fixed geographic location repeatedly photographed over
//! time — and the pure decisions behind its derived views.
//!
//! A viewpoint exposes two derived readings that use different orderings:
//! the representative picture is the most recently *created* one, while
//! `last_accepted_picture_date` is the max *capture* date among accepted
//! pictures. Capture-date order also drives identifier ranks; see
//! [`crate::picture`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  lookup::{CityId, ThemeId},
  picture::{Picture, PictureState},
};

pub type ViewpointId = i64;

// ─── Viewpoint ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewpoint {
  pub viewpoint_id: ViewpointId,
  pub created_at:   DateTime<Utc>,
  pub label:        String,
  /// The geographic point itself is owned externally; we only keep its
  /// reference for annotation.
  pub point:        String,
  pub city:         Option<CityId>,
  pub themes:       Vec<ThemeId>,
  pub properties:   serde_json::Value,
  pub active:       bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewViewpoint {
  pub label:      String,
  pub point:      String,
  /// Raw city label; canonicalized and resolved (or created) by the store.
  pub city:       Option<String>,
  #[serde(default)]
  pub themes:     Vec<ThemeId>,
  #[serde(default)]
  pub properties: serde_json::Value,
  #[serde(default = "default_active")]
  pub active:     bool,
}

fn default_active() -> bool { true }

/// A partial update to a viewpoint. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewpointPatch {
  pub label:      Option<String>,
  pub point:      Option<String>,
  /// `Some(Some(label))` resolves or creates the city, `Some(None)` detaches.
  #[serde(default, deserialize_with = "crate::serde_ext::double_option")]
  pub city:       Option<Option<String>>,
  pub themes:     Option<Vec<ThemeId>>,
  pub properties: Option<serde_json::Value>,
  pub active:     Option<bool>,
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// A viewpoint's status for listing: the state of its most recently created
/// picture, or `missing` when it has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewpointStatus {
  Missing,
  Draft,
  Submitted,
  Accepted,
  Refused,
}

/// Compute the status from pictures ordered by creation time descending.
pub fn viewpoint_status(pictures_newest_first: &[Picture]) -> ViewpointStatus {
  match pictures_newest_first.first() {
    None => ViewpointStatus::Missing,
    Some(p) => match p.state {
      PictureState::Draft => ViewpointStatus::Draft,
      PictureState::Submitted => ViewpointStatus::Submitted,
      PictureState::Accepted => ViewpointStatus::Accepted,
      PictureState::Refused => ViewpointStatus::Refused,
    },
  }
}

// ─── Thumbnail maintenance ───────────────────────────────────────────────────

/// What the point annotation should do after a picture mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailUpdate {
  /// Re-point the thumbnail annotation at this picture.
  Set(Picture),
  /// No pictures remain; remove the annotation entirely.
  Clear,
  /// The mutation did not touch the most recent picture; leave it alone.
  Keep,
}

/// Decision after a picture was created or updated. The thumbnail follows
/// the most recently created picture, so only a save that is (or becomes)
/// the newest one re-points it.
pub fn thumbnail_after_save(
  saved: &Picture,
  pictures_newest_first: &[Picture],
) -> ThumbnailUpdate {
  match pictures_newest_first.first() {
    Some(newest) if newest.picture_id == saved.picture_id => {
      ThumbnailUpdate::Set(saved.clone())
    }
    _ => ThumbnailUpdate::Keep,
  }
}

/// Decision before a picture is deleted, given the viewpoint's pictures
/// ordered by creation time descending (the doomed picture still included).
pub fn thumbnail_after_delete(
  doomed: &Picture,
  pictures_newest_first: &[Picture],
) -> ThumbnailUpdate {
  let was_newest = pictures_newest_first
    .first()
    .is_some_and(|p| p.picture_id == doomed.picture_id);
  if !was_newest {
    return ThumbnailUpdate::Keep;
  }
  match pictures_newest_first.get(1) {
    Some(next) => ThumbnailUpdate::Set(next.clone()),
    None => ThumbnailUpdate::Clear,
  }
}
