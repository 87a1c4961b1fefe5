//! The `ObservationStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `belvedere-store-sqlite`). The workflow engine and the API depend on this
//! abstraction, not on any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  actor::ActorId,
  campaign::{Campaign, CampaignId, CampaignState, NewCampaign},
  lookup::{City, Theme},
  picture::{Picture, PictureId, PictureState},
  viewpoint::{NewViewpoint, Viewpoint, ViewpointId},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// The two picture orderings the engine needs. They are deliberately a closed
/// enum so call sites name which one they mean: representative-picture
/// selection uses creation time, identifier ranking uses capture date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureOrder {
  /// Creation time descending, newest insert first.
  NewestFirst,
  /// Capture date ascending, earliest photograph first.
  ByCaptureDate,
}

/// Filter for [`ObservationStore::list_pictures`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PictureFilter {
  pub viewpoint: Option<ViewpointId>,
  pub campaign:  Option<CampaignId>,
  pub state:     Option<PictureState>,
  pub owner:     Option<ActorId>,
}

/// A fully-decided picture insert. Owner, campaign, state and identifier
/// have already been resolved by the workflow engine; the store only assigns
/// the id and the creation timestamp.
#[derive(Debug, Clone)]
pub struct PictureRecord {
  pub owner:      ActorId,
  pub viewpoint:  ViewpointId,
  pub campaign:   Option<CampaignId>,
  pub state:      PictureState,
  /// Pre-computed permanent identifier, for pictures born `accepted`.
  pub identifier: Option<i64>,
  pub date:       DateTime<Utc>,
  pub file:       String,
  pub properties: serde_json::Value,
}

impl PictureRecord {
  /// The picture this record will become. The id and upload timestamp are
  /// store-assigned and stand in as placeholders here; aggregate evaluation
  /// ignores both.
  pub fn preview(&self) -> Picture {
    Picture {
      picture_id: 0,
      owner:      self.owner,
      viewpoint:  self.viewpoint,
      campaign:   self.campaign,
      state:      self.state,
      identifier: self.identifier,
      date:       self.date,
      created_at: self.date,
      file:       self.file.clone(),
      properties: self.properties.clone(),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Belvedere entity store.
pub trait ObservationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Cities & themes ───────────────────────────────────────────────────

  /// Resolve a city by label, creating it if absent. The label is stored in
  /// canonical capitalized form regardless of input casing.
  fn get_or_create_city<'a>(
    &'a self,
    label: &'a str,
  ) -> impl Future<Output = Result<City, Self::Error>> + Send + 'a;

  /// Exact-match lookup against the stored (canonical) label.
  fn find_city<'a>(
    &'a self,
    label: &'a str,
  ) -> impl Future<Output = Result<Option<City>, Self::Error>> + Send + 'a;

  fn list_cities(
    &self,
  ) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + '_;

  fn get_or_create_theme<'a>(
    &'a self,
    label: &'a str,
  ) -> impl Future<Output = Result<Theme, Self::Error>> + Send + 'a;

  fn list_themes(
    &self,
  ) -> impl Future<Output = Result<Vec<Theme>, Self::Error>> + Send + '_;

  // ── Viewpoints ────────────────────────────────────────────────────────

  fn add_viewpoint(
    &self,
    new: NewViewpoint,
  ) -> impl Future<Output = Result<Viewpoint, Self::Error>> + Send + '_;

  /// Persist changed fields of an existing viewpoint.
  fn update_viewpoint<'a>(
    &'a self,
    viewpoint: &'a Viewpoint,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_viewpoint(
    &self,
    id: ViewpointId,
  ) -> impl Future<Output = Result<Option<Viewpoint>, Self::Error>> + Send + '_;

  /// List viewpoints, newest first; optionally only active ones.
  fn list_viewpoints(
    &self,
    active_only: bool,
  ) -> impl Future<Output = Result<Vec<Viewpoint>, Self::Error>> + Send + '_;

  /// Delete a viewpoint and, by cascade, all of its pictures.
  /// Returns `false` if the viewpoint did not exist.
  fn delete_viewpoint(
    &self,
    id: ViewpointId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Max capture date among the viewpoint's `accepted` pictures.
  fn last_accepted_picture_date(
    &self,
    id: ViewpointId,
  ) -> impl Future<Output = Result<Option<DateTime<Utc>>, Self::Error>> + Send + '_;

  // ── Campaigns ─────────────────────────────────────────────────────────

  fn add_campaign(
    &self,
    owner: ActorId,
    new: NewCampaign,
  ) -> impl Future<Output = Result<Campaign, Self::Error>> + Send + '_;

  fn get_campaign(
    &self,
    id: CampaignId,
  ) -> impl Future<Output = Result<Option<Campaign>, Self::Error>> + Send + '_;

  /// All campaigns, most recent start date first.
  fn list_campaigns(
    &self,
  ) -> impl Future<Output = Result<Vec<Campaign>, Self::Error>> + Send + '_;

  /// Campaigns assigned to a photographer, restricted to the given states.
  fn list_campaigns_for_assignee<'a>(
    &'a self,
    assignee: ActorId,
    states: &'a [CampaignState],
  ) -> impl Future<Output = Result<Vec<Campaign>, Self::Error>> + Send + 'a;

  fn set_campaign_state(
    &self,
    id: CampaignId,
    state: CampaignState,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn campaign_viewpoints(
    &self,
    id: CampaignId,
  ) -> impl Future<Output = Result<Vec<ViewpointId>, Self::Error>> + Send + '_;

  /// Started campaigns assigned to `assignee` whose viewpoint set contains
  /// `viewpoint`, ordered by start date ascending then id ascending.
  /// The ordering makes implicit campaign resolution deterministic.
  fn started_campaigns_for(
    &self,
    assignee: ActorId,
    viewpoint: ViewpointId,
  ) -> impl Future<Output = Result<Vec<Campaign>, Self::Error>> + Send + '_;

  /// Delete a campaign; its pictures survive with their campaign nulled.
  /// Returns `false` if the campaign did not exist.
  fn delete_campaign(
    &self,
    id: CampaignId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Pictures ──────────────────────────────────────────────────────────

  /// Insert a picture and return it with its assigned id and `created_at`.
  /// Campaign transitions caused by the insert apply in the same atomic
  /// unit: either every write lands or none do.
  fn insert_picture(
    &self,
    record: PictureRecord,
    campaign_states: Vec<(CampaignId, CampaignState)>,
  ) -> impl Future<Output = Result<Picture, Self::Error>> + Send + '_;

  /// Persist the mutable fields of an existing picture (owner, campaign,
  /// state, identifier, date, file, properties), atomically with any
  /// campaign transitions the change causes.
  fn update_picture<'a>(
    &'a self,
    picture: &'a Picture,
    campaign_states: Vec<(CampaignId, CampaignState)>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_picture(
    &self,
    id: PictureId,
  ) -> impl Future<Output = Result<Option<Picture>, Self::Error>> + Send + '_;

  /// Delete a picture, atomically with any campaign transitions the removal
  /// causes.
  fn delete_picture(
    &self,
    id: PictureId,
    campaign_states: Vec<(CampaignId, CampaignState)>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All pictures of a viewpoint in the requested [`PictureOrder`].
  fn viewpoint_pictures(
    &self,
    viewpoint: ViewpointId,
    order: PictureOrder,
  ) -> impl Future<Output = Result<Vec<Picture>, Self::Error>> + Send + '_;

  /// All pictures submitted under a campaign.
  fn campaign_pictures(
    &self,
    campaign: CampaignId,
  ) -> impl Future<Output = Result<Vec<Picture>, Self::Error>> + Send + '_;

  /// Whether a picture already exists for this (viewpoint, campaign) pair.
  fn picture_exists(
    &self,
    viewpoint: ViewpointId,
    campaign: CampaignId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Filtered picture listing, newest first.
  fn list_pictures(
    &self,
    filter: PictureFilter,
  ) -> impl Future<Output = Result<Vec<Picture>, Self::Error>> + Send + '_;
}
