//! The picture/campaign workflow engine.
//!
//! [`Workflow`] owns every rule that decides whether a mutation is allowed
//! and what it cascades into: role-gated picture transitions, campaign
//! assignment resolution for photographers, permanent identifier assignment
//! on first acceptance, campaign aggregate refresh with auto-close, and
//! derived-view (thumbnail) maintenance. Identifier and campaign
//! consequences are decided up front and handed to the store as one atomic
//! write; annotation hooks run after the commit, in a fixed order.
//!
//! Two failure shapes are deliberately different and must stay that way:
//! a photographer asking for an over-privileged *target* state is silently
//! clamped to `draft`, while a photographer touching a picture whose
//! *current* state is outside `draft`/`refused` gets [`Error::Forbidden`].

use crate::{
  actor::{Actor, Capability, CapabilityCheck},
  annotate::PointAnnotator,
  campaign::{
    Campaign, CampaignId, CampaignState, CampaignStatistics, NewCampaign,
  },
  error::{Error, Result},
  lookup::{City, Theme},
  picture::{
    NewPicture, Picture, PictureId, PicturePatch, PictureState,
    picture_identifier,
  },
  store::{ObservationStore, PictureOrder, PictureRecord},
  viewpoint::{
    NewViewpoint, Viewpoint, ViewpointId, ViewpointPatch, ViewpointStatus,
    ThumbnailUpdate, thumbnail_after_delete, thumbnail_after_save,
    viewpoint_status,
  },
};

use chrono::{DateTime, Utc};
use serde::Serialize;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Engine configuration, threaded in explicitly at construction.
#[derive(Debug, Clone, Copy)]
pub struct ObservatoryConfig {
  /// Global observatory id, the leading component of picture identifiers.
  pub observatory_id:    u32,
  /// When `false` the review workflow is bypassed entirely: every picture
  /// save is forced straight to `accepted`.
  pub pictures_workflow: bool,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A viewpoint with its derived fields, as exposed by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ViewpointSummary {
  #[serde(flatten)]
  pub viewpoint:                  Viewpoint,
  pub status:                     ViewpointStatus,
  /// Most recently created picture, any state.
  pub picture:                    Option<Picture>,
  /// Max capture date among accepted pictures.
  pub last_accepted_picture_date: Option<DateTime<Utc>>,
}

// ─── Pure transition rules ───────────────────────────────────────────────────

/// Clamp a photographer's requested target state. Anything outside
/// `draft`/`submitted` is downgraded to `draft` — a deliberate silent clamp,
/// not an error.
pub fn clamp_requested_state(requested: PictureState) -> PictureState {
  match requested {
    PictureState::Draft | PictureState::Submitted => requested,
    PictureState::Accepted | PictureState::Refused => PictureState::Draft,
  }
}

/// Whether a photographer may mutate a picture in this state at all.
/// Touching `submitted` or `accepted` pictures is a permission violation.
fn photographer_may_mutate(state: PictureState) -> bool {
  matches!(state, PictureState::Draft | PictureState::Refused)
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct Workflow<S, C, A> {
  store:        S,
  capabilities: C,
  annotator:    A,
  config:       ObservatoryConfig,
}

impl<S, C, A> Workflow<S, C, A>
where
  S: ObservationStore,
  C: CapabilityCheck,
  A: PointAnnotator,
{
  pub fn new(
    store: S,
    capabilities: C,
    annotator: A,
    config: ObservatoryConfig,
  ) -> Self {
    Self { store, capabilities, annotator, config }
  }

  /// Direct access to the underlying store, for read-only plumbing that has
  /// no workflow rules attached (lookup listings and the like).
  pub fn store(&self) -> &S { &self.store }

  fn holds(&self, actor: &Actor, capability: Capability) -> bool {
    self.capabilities.holds(actor, capability)
  }

  // ── Pictures ──────────────────────────────────────────────────────────

  /// Create a picture on behalf of `actor`.
  ///
  /// Picture managers bypass campaign assignment: any explicit campaign is
  /// taken as-is, the requested state is honoured (default `accepted`), and
  /// ownership may be delegated. Photographers go through campaign
  /// resolution and the duplicate-submission check, and their requested
  /// state is clamped.
  pub async fn create_picture(
    &self,
    actor: &Actor,
    new: NewPicture,
  ) -> Result<Picture> {
    let viewpoint = self
      .store
      .get_viewpoint(new.viewpoint)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ViewpointNotFound(new.viewpoint))?;

    let (owner, campaign, state) =
      if self.holds(actor, Capability::ManagePictures) {
        if let Some(id) = new.campaign {
          self
            .store
            .get_campaign(id)
            .await
            .map_err(Error::store)?
            .ok_or(Error::CampaignMissing(id))?;
        }
        (
          new.owner.unwrap_or(actor.actor_id),
          new.campaign,
          new.state.unwrap_or(PictureState::Accepted),
        )
      } else if self.holds(actor, Capability::AddPictures) {
        let campaign =
          self.resolve_campaign(actor, new.viewpoint, new.campaign).await?;
        if self
          .store
          .picture_exists(new.viewpoint, campaign.campaign_id)
          .await
          .map_err(Error::store)?
        {
          return Err(Error::PictureAlreadyExists);
        }
        let state = new.state.map_or(PictureState::Draft, clamp_requested_state);
        (actor.actor_id, Some(campaign.campaign_id), state)
      } else {
        return Err(Error::Forbidden);
      };

    let state = self.enforce_workflow_toggle(state);

    let identifier = if state == PictureState::Accepted {
      let rank = self.rank_of_new_picture(new.viewpoint, new.date).await?;
      Some(picture_identifier(self.config.observatory_id, new.viewpoint, rank)?)
    } else {
      None
    };

    let record = PictureRecord {
      owner,
      viewpoint: new.viewpoint,
      campaign,
      state,
      identifier,
      date: new.date,
      file: new.file,
      properties: new.properties,
    };

    let campaign_states = match campaign {
      Some(id) => {
        let mut pictures = self.campaign_pictures_without(id, 0).await?;
        pictures.push(record.preview());
        Vec::from_iter(self.campaign_close_decision(id, &pictures).await?)
      }
      None => vec![],
    };

    let picture = self
      .store
      .insert_picture(record, campaign_states.clone())
      .await
      .map_err(Error::store)?;

    tracing::info!(
      picture = picture.picture_id,
      viewpoint = picture.viewpoint,
      state = picture.state.as_str(),
      "picture created"
    );
    if let Some(identifier) = picture.identifier {
      tracing::info!(
        picture = picture.picture_id,
        identifier,
        "assigned permanent identifier"
      );
    }
    self.log_campaign_transitions(&campaign_states);

    self.refresh_thumbnail(&viewpoint, &picture).await?;
    Ok(picture)
  }

  /// Apply a patch to a picture on behalf of `actor`.
  pub async fn update_picture(
    &self,
    actor: &Actor,
    id: PictureId,
    patch: PicturePatch,
  ) -> Result<Picture> {
    let mut picture = self
      .store
      .get_picture(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PictureNotFound(id))?;
    let previous_campaign = picture.campaign;

    if self.holds(actor, Capability::ManagePictures) {
      if let Some(state) = patch.state {
        picture.state = state;
      }
      if let Some(owner) = patch.owner {
        picture.owner = owner;
      }
      if let Some(campaign) = patch.campaign {
        if let Some(id) = campaign {
          self
            .store
            .get_campaign(id)
            .await
            .map_err(Error::store)?
            .ok_or(Error::CampaignMissing(id))?;
        }
        picture.campaign = campaign;
      }
    } else if self.holds(actor, Capability::AddPictures) {
      if picture.owner != actor.actor_id
        || !photographer_may_mutate(picture.state)
      {
        return Err(Error::Forbidden);
      }
      if let Some(state) = patch.state {
        picture.state = clamp_requested_state(state);
      }
      // Photographer patches never reassign ownership or move the picture
      // between campaigns.
      picture.owner = actor.actor_id;
    } else {
      return Err(Error::Forbidden);
    }

    if let Some(date) = patch.date {
      picture.date = date;
    }
    if let Some(file) = patch.file {
      picture.file = file;
    }
    if let Some(properties) = patch.properties {
      picture.properties = properties;
    }

    picture.state = self.enforce_workflow_toggle(picture.state);

    let had_identifier = picture.identifier.is_some();
    if picture.state == PictureState::Accepted && picture.identifier.is_none() {
      let rank = self.rank_of_existing_picture(&picture).await?;
      picture.identifier = Some(picture_identifier(
        self.config.observatory_id,
        picture.viewpoint,
        rank,
      )?);
    }

    let mut campaign_states = Vec::new();
    if let Some(id) = picture.campaign {
      let mut pictures =
        self.campaign_pictures_without(id, picture.picture_id).await?;
      pictures.push(picture.clone());
      campaign_states
        .extend(self.campaign_close_decision(id, &pictures).await?);
    }
    // A campaign detached by this update still needs its aggregates
    // re-evaluated against the remaining pictures.
    if let Some(id) = previous_campaign
      && previous_campaign != picture.campaign
    {
      let pictures =
        self.campaign_pictures_without(id, picture.picture_id).await?;
      campaign_states
        .extend(self.campaign_close_decision(id, &pictures).await?);
    }

    self
      .store
      .update_picture(&picture, campaign_states.clone())
      .await
      .map_err(Error::store)?;

    tracing::info!(
      picture = picture.picture_id,
      state = picture.state.as_str(),
      "picture updated"
    );
    if !had_identifier && let Some(identifier) = picture.identifier {
      tracing::info!(
        picture = picture.picture_id,
        identifier,
        "assigned permanent identifier"
      );
    }
    self.log_campaign_transitions(&campaign_states);

    let viewpoint = self
      .store
      .get_viewpoint(picture.viewpoint)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ViewpointNotFound(picture.viewpoint))?;

    self.refresh_thumbnail(&viewpoint, &picture).await?;
    Ok(picture)
  }

  /// Delete a picture, re-pointing or clearing the viewpoint thumbnail if
  /// the deleted picture was the most recently created one.
  pub async fn delete_picture(&self, actor: &Actor, id: PictureId) -> Result<()> {
    let picture = self
      .store
      .get_picture(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PictureNotFound(id))?;

    let allowed = self.holds(actor, Capability::ManagePictures)
      || (self.holds(actor, Capability::AddPictures)
        && picture.owner == actor.actor_id
        && photographer_may_mutate(picture.state));
    if !allowed {
      return Err(Error::Forbidden);
    }

    let viewpoint = self
      .store
      .get_viewpoint(picture.viewpoint)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ViewpointNotFound(picture.viewpoint))?;

    // Decide the thumbnail outcome before the row disappears.
    let ordered = self
      .store
      .viewpoint_pictures(picture.viewpoint, PictureOrder::NewestFirst)
      .await
      .map_err(Error::store)?;
    let decision = thumbnail_after_delete(&picture, &ordered);

    let campaign_states = match picture.campaign {
      Some(campaign) => {
        let pictures =
          self.campaign_pictures_without(campaign, picture.picture_id).await?;
        Vec::from_iter(
          self.campaign_close_decision(campaign, &pictures).await?,
        )
      }
      None => vec![],
    };

    self
      .store
      .delete_picture(id, campaign_states.clone())
      .await
      .map_err(Error::store)?;
    tracing::info!(picture = id, viewpoint = picture.viewpoint, "picture deleted");
    self.log_campaign_transitions(&campaign_states);

    self.apply_thumbnail_update(&viewpoint, decision).await
  }

  pub async fn get_picture(&self, id: PictureId) -> Result<Picture> {
    self
      .store
      .get_picture(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PictureNotFound(id))
  }

  // ── Campaign assignment resolution ────────────────────────────────────

  /// Resolve the campaign a photographer's new picture belongs to.
  ///
  /// An explicitly named campaign must be assigned to the actor, `started`,
  /// and include the viewpoint. With none named, the eligible campaign with
  /// the earliest start date wins. Either way, failure to resolve is
  /// [`Error::CampaignNotFound`].
  async fn resolve_campaign(
    &self,
    actor: &Actor,
    viewpoint: ViewpointId,
    explicit: Option<CampaignId>,
  ) -> Result<Campaign> {
    let eligible = self
      .store
      .started_campaigns_for(actor.actor_id, viewpoint)
      .await
      .map_err(Error::store)?;

    match explicit {
      Some(id) => eligible
        .into_iter()
        .find(|c| c.campaign_id == id)
        .ok_or(Error::CampaignNotFound),
      None => eligible.into_iter().next().ok_or(Error::CampaignNotFound),
    }
  }

  // ── Aggregate decisions ───────────────────────────────────────────────

  /// 1-based rank a brand-new picture with this capture date will take among
  /// the viewpoint's pictures ordered by capture date ascending. The new row
  /// necessarily gets the highest id, so equal dates sort before it.
  async fn rank_of_new_picture(
    &self,
    viewpoint: ViewpointId,
    date: DateTime<Utc>,
  ) -> Result<usize> {
    let by_date = self
      .store
      .viewpoint_pictures(viewpoint, PictureOrder::ByCaptureDate)
      .await
      .map_err(Error::store)?;
    Ok(by_date.iter().filter(|p| p.date <= date).count() + 1)
  }

  /// 1-based rank of an existing picture with its pending capture date
  /// substituted in, ordered by capture date ascending then id.
  async fn rank_of_existing_picture(&self, picture: &Picture) -> Result<usize> {
    let by_date = self
      .store
      .viewpoint_pictures(picture.viewpoint, PictureOrder::ByCaptureDate)
      .await
      .map_err(Error::store)?;
    if !by_date.iter().any(|p| p.picture_id == picture.picture_id) {
      return Err(Error::Validation(format!(
        "picture {} missing from viewpoint {} ordering",
        picture.picture_id, picture.viewpoint
      )));
    }
    let before = by_date
      .iter()
      .filter(|p| p.picture_id != picture.picture_id)
      .filter(|p| (p.date, p.picture_id) < (picture.date, picture.picture_id))
      .count();
    Ok(before + 1)
  }

  /// A campaign's pictures with the one under mutation excluded, so the
  /// pending version (if any) can be substituted before aggregation.
  async fn campaign_pictures_without(
    &self,
    id: CampaignId,
    excluded: PictureId,
  ) -> Result<Vec<Picture>> {
    let mut pictures =
      self.store.campaign_pictures(id).await.map_err(Error::store)?;
    pictures.retain(|p| p.picture_id != excluded);
    Ok(pictures)
  }

  /// Evaluate the auto-close rule against a pending picture set: a `started`
  /// campaign closes once every assigned viewpoint has an accepted picture.
  /// A closed campaign never re-transitions, whatever the recompute says.
  async fn campaign_close_decision(
    &self,
    id: CampaignId,
    pictures: &[Picture],
  ) -> Result<Option<(CampaignId, CampaignState)>> {
    let campaign = self
      .store
      .get_campaign(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CampaignMissing(id))?;
    let viewpoints =
      self.store.campaign_viewpoints(id).await.map_err(Error::store)?;
    let stats = CampaignStatistics::compute(&viewpoints, pictures);

    Ok(
      (campaign.state == CampaignState::Started && stats.is_complete())
        .then_some((id, CampaignState::Closed)),
    )
  }

  fn log_campaign_transitions(
    &self,
    transitions: &[(CampaignId, CampaignState)],
  ) {
    for (campaign, state) in transitions {
      tracing::info!(
        campaign = *campaign,
        state = state.as_str(),
        "campaign state transitioned"
      );
    }
  }

  /// Re-evaluate the thumbnail after a committed save.
  async fn refresh_thumbnail(
    &self,
    viewpoint: &Viewpoint,
    saved: &Picture,
  ) -> Result<()> {
    let ordered = self
      .store
      .viewpoint_pictures(saved.viewpoint, PictureOrder::NewestFirst)
      .await
      .map_err(Error::store)?;
    let decision = thumbnail_after_save(saved, &ordered);
    self.apply_thumbnail_update(viewpoint, decision).await
  }

  async fn apply_thumbnail_update(
    &self,
    viewpoint: &Viewpoint,
    decision: ThumbnailUpdate,
  ) -> Result<()> {
    match decision {
      ThumbnailUpdate::Set(picture) => {
        tracing::debug!(
          viewpoint = viewpoint.viewpoint_id,
          picture = picture.picture_id,
          "re-pointing thumbnail annotation"
        );
        self
          .annotator
          .set_thumbnail(viewpoint, &picture)
          .await
          .map_err(Error::annotation)
      }
      ThumbnailUpdate::Clear => {
        tracing::debug!(
          viewpoint = viewpoint.viewpoint_id,
          "clearing thumbnail annotation"
        );
        self
          .annotator
          .clear_thumbnail(viewpoint)
          .await
          .map_err(Error::annotation)
      }
      ThumbnailUpdate::Keep => Ok(()),
    }
  }

  fn enforce_workflow_toggle(&self, state: PictureState) -> PictureState {
    if self.config.pictures_workflow { state } else { PictureState::Accepted }
  }

  // ── Campaigns ─────────────────────────────────────────────────────────

  pub async fn create_campaign(
    &self,
    actor: &Actor,
    new: NewCampaign,
  ) -> Result<Campaign> {
    if !self.holds(actor, Capability::ManageCampaigns) {
      return Err(Error::Forbidden);
    }
    self.store.add_campaign(actor.actor_id, new).await.map_err(Error::store)
  }

  /// Campaign managers see every campaign; photographers only their
  /// assigned ones in `started` or `closed` state.
  pub async fn list_campaigns(&self, actor: &Actor) -> Result<Vec<Campaign>> {
    if self.holds(actor, Capability::ManageCampaigns) {
      self.store.list_campaigns().await.map_err(Error::store)
    } else if self.holds(actor, Capability::AddPictures) {
      self
        .store
        .list_campaigns_for_assignee(
          actor.actor_id,
          &[CampaignState::Started, CampaignState::Closed],
        )
        .await
        .map_err(Error::store)
    } else {
      Err(Error::Forbidden)
    }
  }

  pub async fn get_campaign(
    &self,
    actor: &Actor,
    id: CampaignId,
  ) -> Result<Campaign> {
    let campaign = self
      .store
      .get_campaign(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CampaignMissing(id))?;

    if self.holds(actor, Capability::ManageCampaigns) {
      return Ok(campaign);
    }
    if self.holds(actor, Capability::AddPictures)
      && campaign.assignee == actor.actor_id
      && campaign.state != CampaignState::Draft
    {
      return Ok(campaign);
    }
    Err(Error::Forbidden)
  }

  /// Pure recompute of a campaign's coverage counts; never transitions.
  pub async fn campaign_statistics(
    &self,
    id: CampaignId,
  ) -> Result<CampaignStatistics> {
    self
      .store
      .get_campaign(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CampaignMissing(id))?;
    let viewpoints =
      self.store.campaign_viewpoints(id).await.map_err(Error::store)?;
    let pictures =
      self.store.campaign_pictures(id).await.map_err(Error::store)?;
    Ok(CampaignStatistics::compute(&viewpoints, &pictures))
  }

  /// Administrative state override. The engine only ever auto-transitions
  /// `started → closed`; anything else, including reopening a closed
  /// campaign, goes through here.
  pub async fn set_campaign_state(
    &self,
    actor: &Actor,
    id: CampaignId,
    state: CampaignState,
  ) -> Result<Campaign> {
    if !self.holds(actor, Capability::ManageCampaigns) {
      return Err(Error::Forbidden);
    }
    self
      .store
      .get_campaign(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CampaignMissing(id))?;
    self.store.set_campaign_state(id, state).await.map_err(Error::store)?;
    tracing::info!(campaign = id, state = state.as_str(), "campaign state set");
    self
      .store
      .get_campaign(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CampaignMissing(id))
  }

  pub async fn delete_campaign(&self, actor: &Actor, id: CampaignId) -> Result<()> {
    if !self.holds(actor, Capability::ManageCampaigns) {
      return Err(Error::Forbidden);
    }
    if !self.store.delete_campaign(id).await.map_err(Error::store)? {
      return Err(Error::CampaignMissing(id));
    }
    Ok(())
  }

  // ── Lookups ───────────────────────────────────────────────────────────

  /// Resolve or create a city under its canonical capitalized label.
  pub async fn create_city(&self, actor: &Actor, label: &str) -> Result<City> {
    if !self.holds(actor, Capability::ManageViewpoints) {
      return Err(Error::Forbidden);
    }
    self.store.get_or_create_city(label).await.map_err(Error::store)
  }

  pub async fn create_theme(&self, actor: &Actor, label: &str) -> Result<Theme> {
    if !self.holds(actor, Capability::ManageViewpoints) {
      return Err(Error::Forbidden);
    }
    self.store.get_or_create_theme(label).await.map_err(Error::store)
  }

  // ── Viewpoints ────────────────────────────────────────────────────────

  pub async fn create_viewpoint(
    &self,
    actor: &Actor,
    new: NewViewpoint,
  ) -> Result<Viewpoint> {
    if !self.holds(actor, Capability::ManageViewpoints) {
      return Err(Error::Forbidden);
    }
    let viewpoint =
      self.store.add_viewpoint(new).await.map_err(Error::store)?;
    self
      .annotator
      .annotate_viewpoint(&viewpoint)
      .await
      .map_err(Error::annotation)?;
    Ok(viewpoint)
  }

  pub async fn update_viewpoint(
    &self,
    actor: &Actor,
    id: ViewpointId,
    patch: ViewpointPatch,
  ) -> Result<Viewpoint> {
    if !self.holds(actor, Capability::ManageViewpoints) {
      return Err(Error::Forbidden);
    }
    let mut viewpoint = self
      .store
      .get_viewpoint(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ViewpointNotFound(id))?;

    if let Some(label) = patch.label {
      viewpoint.label = label;
    }
    if let Some(point) = patch.point {
      viewpoint.point = point;
    }
    if let Some(city) = patch.city {
      viewpoint.city = match city {
        Some(label) => Some(
          self
            .store
            .get_or_create_city(&label)
            .await
            .map_err(Error::store)?
            .city_id,
        ),
        None => None,
      };
    }
    if let Some(themes) = patch.themes {
      viewpoint.themes = themes;
    }
    if let Some(properties) = patch.properties {
      viewpoint.properties = properties;
    }
    if let Some(active) = patch.active {
      viewpoint.active = active;
    }

    self.store.update_viewpoint(&viewpoint).await.map_err(Error::store)?;
    self
      .annotator
      .annotate_viewpoint(&viewpoint)
      .await
      .map_err(Error::annotation)?;
    Ok(viewpoint)
  }

  pub async fn delete_viewpoint(
    &self,
    actor: &Actor,
    id: ViewpointId,
  ) -> Result<()> {
    if !self.holds(actor, Capability::ManageViewpoints) {
      return Err(Error::Forbidden);
    }
    if !self.store.delete_viewpoint(id).await.map_err(Error::store)? {
      return Err(Error::ViewpointNotFound(id));
    }
    Ok(())
  }

  pub async fn get_viewpoint(&self, id: ViewpointId) -> Result<ViewpointSummary> {
    let viewpoint = self
      .store
      .get_viewpoint(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ViewpointNotFound(id))?;
    self.summarize(viewpoint).await
  }

  pub async fn list_viewpoints(
    &self,
    active_only: bool,
  ) -> Result<Vec<ViewpointSummary>> {
    let viewpoints = self
      .store
      .list_viewpoints(active_only)
      .await
      .map_err(Error::store)?;
    let mut summaries = Vec::with_capacity(viewpoints.len());
    for viewpoint in viewpoints {
      summaries.push(self.summarize(viewpoint).await?);
    }
    Ok(summaries)
  }

  pub async fn last_accepted_picture_date(
    &self,
    id: ViewpointId,
  ) -> Result<Option<DateTime<Utc>>> {
    self
      .store
      .get_viewpoint(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ViewpointNotFound(id))?;
    self.store.last_accepted_picture_date(id).await.map_err(Error::store)
  }

  async fn summarize(&self, viewpoint: Viewpoint) -> Result<ViewpointSummary> {
    let pictures = self
      .store
      .viewpoint_pictures(viewpoint.viewpoint_id, PictureOrder::NewestFirst)
      .await
      .map_err(Error::store)?;
    let last_accepted_picture_date = self
      .store
      .last_accepted_picture_date(viewpoint.viewpoint_id)
      .await
      .map_err(Error::store)?;
    Ok(ViewpointSummary {
      status: viewpoint_status(&pictures),
      picture: pictures.into_iter().next(),
      last_accepted_picture_date,
      viewpoint,
    })
  }
}
