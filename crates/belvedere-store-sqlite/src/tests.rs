//! Integration tests driving the workflow engine against an in-memory
//! SQLite store.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex},
};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use belvedere_core::{
  Error as CoreError,
  actor::{Actor, ActorId, Capability, CapabilityCheck},
  annotate::PointAnnotator,
  campaign::{Campaign, CampaignState, NewCampaign},
  picture::{NewPicture, Picture, PicturePatch, PictureState},
  store::{ObservationStore, PictureFilter, PictureRecord},
  viewpoint::{NewViewpoint, Viewpoint, ViewpointPatch, ViewpointStatus},
  workflow::{ObservatoryConfig, Workflow},
};

use crate::SqliteStore;

// ─── Test doubles ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct TestCaps {
  managers:      HashSet<ActorId>,
  photographers: HashSet<ActorId>,
}

impl CapabilityCheck for TestCaps {
  fn holds(&self, actor: &Actor, capability: Capability) -> bool {
    match capability {
      Capability::AddPictures => {
        self.photographers.contains(&actor.actor_id)
      }
      Capability::ManagePictures
      | Capability::ManageCampaigns
      | Capability::ManageViewpoints => self.managers.contains(&actor.actor_id),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Annotation {
  Annotated(i64),
  /// (viewpoint, picture)
  Thumbnail(i64, i64),
  Cleared(i64),
}

#[derive(Clone, Default)]
struct RecordingAnnotator {
  events: Arc<Mutex<Vec<Annotation>>>,
}

impl RecordingAnnotator {
  fn events(&self) -> Vec<Annotation> {
    self.events.lock().unwrap().clone()
  }

  fn last(&self) -> Option<Annotation> {
    self.events.lock().unwrap().last().cloned()
  }
}

impl PointAnnotator for RecordingAnnotator {
  type Error = std::convert::Infallible;

  async fn annotate_viewpoint(&self, viewpoint: &Viewpoint) -> Result<(), Self::Error> {
    self
      .events
      .lock()
      .unwrap()
      .push(Annotation::Annotated(viewpoint.viewpoint_id));
    Ok(())
  }

  async fn set_thumbnail(
    &self,
    viewpoint: &Viewpoint,
    picture: &Picture,
  ) -> Result<(), Self::Error> {
    self.events.lock().unwrap().push(Annotation::Thumbnail(
      viewpoint.viewpoint_id,
      picture.picture_id,
    ));
    Ok(())
  }

  async fn clear_thumbnail(&self, viewpoint: &Viewpoint) -> Result<(), Self::Error> {
    self
      .events
      .lock()
      .unwrap()
      .push(Annotation::Cleared(viewpoint.viewpoint_id));
    Ok(())
  }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

struct Harness {
  flow:         Workflow<SqliteStore, TestCaps, RecordingAnnotator>,
  annotator:    RecordingAnnotator,
  manager:      Actor,
  photographer: Actor,
}

async fn harness() -> Harness { harness_with(true).await }

async fn harness_with(pictures_workflow: bool) -> Harness {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let manager = Actor::new(Uuid::new_v4());
  let photographer = Actor::new(Uuid::new_v4());
  let caps = TestCaps {
    managers:      HashSet::from([manager.actor_id]),
    photographers: HashSet::from([photographer.actor_id]),
  };
  let annotator = RecordingAnnotator::default();
  let flow = Workflow::new(
    store,
    caps,
    annotator.clone(),
    ObservatoryConfig { observatory_id: 20, pictures_workflow },
  );
  Harness { flow, annotator, manager, photographer }
}

impl Harness {
  async fn viewpoint(&self, label: &str) -> Viewpoint {
    self
      .flow
      .create_viewpoint(
        &self.manager,
        NewViewpoint {
          label:      label.into(),
          point:      format!("features/{label}"),
          city:       None,
          themes:     vec![],
          properties: json!({}),
          active:     true,
        },
      )
      .await
      .unwrap()
  }

  async fn campaign(
    &self,
    viewpoints: &[i64],
    start_date: NaiveDate,
    state: CampaignState,
  ) -> Campaign {
    self
      .flow
      .create_campaign(
        &self.manager,
        NewCampaign {
          label: "seasonal survey".into(),
          start_date,
          assignee: self.photographer.actor_id,
          state,
          viewpoints: viewpoints.to_vec(),
        },
      )
      .await
      .unwrap()
  }
}

fn day(d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
}

fn march(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 3, d).unwrap() }

fn new_picture(viewpoint: i64, date: DateTime<Utc>) -> NewPicture {
  NewPicture {
    viewpoint,
    campaign: None,
    state: None,
    owner: None,
    date,
    file: "shot.jpg".into(),
    properties: json!({}),
  }
}

// ─── Cities & themes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn city_labels_are_canonicalized() {
  let h = harness().await;
  let s = h.flow.store();

  let lyon = s.get_or_create_city("LYON").await.unwrap();
  assert_eq!(lyon.label, "Lyon");

  // Any casing resolves to the same row.
  let again = s.get_or_create_city("lyon").await.unwrap();
  assert_eq!(again.city_id, lyon.city_id);

  let cities = s.list_cities().await.unwrap();
  assert_eq!(cities.len(), 1);
}

#[tokio::test]
async fn find_city_is_exact_match_on_canonical_label() {
  let h = harness().await;
  let s = h.flow.store();

  s.get_or_create_city("paris").await.unwrap();

  assert!(s.find_city("PARIS").await.unwrap().is_none());
  assert!(s.find_city("Paris").await.unwrap().is_some());
}

#[tokio::test]
async fn themes_are_created_once() {
  let h = harness().await;
  let s = h.flow.store();

  let a = s.get_or_create_theme("Forests").await.unwrap();
  let b = s.get_or_create_theme("Forests").await.unwrap();
  assert_eq!(a.theme_id, b.theme_id);
  assert_eq!(s.list_themes().await.unwrap().len(), 1);
}

// ─── Viewpoints ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_viewpoint_requires_capability() {
  let h = harness().await;
  let err = h
    .flow
    .create_viewpoint(
      &h.photographer,
      NewViewpoint {
        label:      "ridge".into(),
        point:      "features/ridge".into(),
        city:       None,
        themes:     vec![],
        properties: json!({}),
        active:     true,
      },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
}

#[tokio::test]
async fn create_viewpoint_annotates_its_point() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  assert_eq!(h.annotator.last(), Some(Annotation::Annotated(vp.viewpoint_id)));
}

#[tokio::test]
async fn new_viewpoint_reports_missing_status() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let summary = h.flow.get_viewpoint(vp.viewpoint_id).await.unwrap();
  assert_eq!(summary.status, ViewpointStatus::Missing);
  assert!(summary.picture.is_none());
  assert!(summary.last_accepted_picture_date.is_none());
}

#[tokio::test]
async fn viewpoint_city_attach_and_detach() {
  let h = harness().await;
  let vp = h.viewpoint("quay").await;

  let updated = h
    .flow
    .update_viewpoint(
      &h.manager,
      vp.viewpoint_id,
      ViewpointPatch { city: Some(Some("mARSEILLE".into())), ..Default::default() },
    )
    .await
    .unwrap();
  assert!(updated.city.is_some());
  assert!(h.flow.store().find_city("Marseille").await.unwrap().is_some());

  let detached = h
    .flow
    .update_viewpoint(
      &h.manager,
      vp.viewpoint_id,
      ViewpointPatch { city: Some(None), ..Default::default() },
    )
    .await
    .unwrap();
  assert!(detached.city.is_none());
}

#[tokio::test]
async fn delete_missing_viewpoint_errors() {
  let h = harness().await;
  let err = h.flow.delete_viewpoint(&h.manager, 999).await.unwrap_err();
  assert!(matches!(err, CoreError::ViewpointNotFound(999)));
}

#[tokio::test]
async fn inactive_viewpoints_are_excluded_from_active_listing() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.viewpoint("quay").await;

  h.flow
    .update_viewpoint(
      &h.manager,
      vp.viewpoint_id,
      ViewpointPatch { active: Some(false), ..Default::default() },
    )
    .await
    .unwrap();

  assert_eq!(h.flow.list_viewpoints(true).await.unwrap().len(), 1);
  assert_eq!(h.flow.list_viewpoints(false).await.unwrap().len(), 2);
}

// ─── Campaign assignment resolution ──────────────────────────────────────────

#[tokio::test]
async fn photographer_without_eligible_campaign_is_rejected() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let err = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::CampaignNotFound));
}

#[tokio::test]
async fn photographer_picture_lands_in_assigned_started_campaign() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let picture = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();

  assert_eq!(picture.campaign, Some(campaign.campaign_id));
  assert_eq!(picture.owner, h.photographer.actor_id);
  assert_eq!(picture.state, PictureState::Draft);
}

#[tokio::test]
async fn eligible_campaigns_join_on_viewpoint_membership() {
  let h = harness().await;
  let ridge = h.viewpoint("ridge").await;
  let quay = h.viewpoint("quay").await;
  let assigned =
    h.campaign(&[ridge.viewpoint_id], march(5), CampaignState::Started).await;
  h.campaign(&[quay.viewpoint_id], march(1), CampaignState::Started).await;

  let eligible = h
    .flow
    .store()
    .started_campaigns_for(h.photographer.actor_id, ridge.viewpoint_id)
    .await
    .unwrap();
  assert_eq!(eligible.len(), 1);
  assert_eq!(eligible[0].campaign_id, assigned.campaign_id);
}

#[tokio::test]
async fn draft_campaign_is_not_eligible() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Draft).await;

  let mut new = new_picture(vp.viewpoint_id, day(10));
  new.campaign = Some(campaign.campaign_id);
  let err = h.flow.create_picture(&h.photographer, new).await.unwrap_err();
  assert!(matches!(err, CoreError::CampaignNotFound));
}

#[tokio::test]
async fn earliest_started_campaign_wins_implicit_resolution() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(15), CampaignState::Started).await;
  let earlier =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let picture = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(20)))
    .await
    .unwrap();
  assert_eq!(picture.campaign, Some(earlier.campaign_id));
}

#[tokio::test]
async fn explicit_campaign_overrides_implicit_choice() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;
  let later =
    h.campaign(&[vp.viewpoint_id], march(15), CampaignState::Started).await;

  let mut new = new_picture(vp.viewpoint_id, day(20));
  new.campaign = Some(later.campaign_id);
  let picture = h.flow.create_picture(&h.photographer, new).await.unwrap();
  assert_eq!(picture.campaign, Some(later.campaign_id));
}

#[tokio::test]
async fn second_submission_to_same_campaign_is_rejected() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  h.flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();
  let err = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(11)))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::PictureAlreadyExists));
}

// ─── Picture state rules ─────────────────────────────────────────────────────

#[tokio::test]
async fn photographer_requested_accepted_is_clamped_to_draft() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let mut new = new_picture(vp.viewpoint_id, day(10));
  new.state = Some(PictureState::Accepted);
  let picture = h.flow.create_picture(&h.photographer, new).await.unwrap();

  // Silent clamp, not an error, and no identifier yet.
  assert_eq!(picture.state, PictureState::Draft);
  assert!(picture.identifier.is_none());
}

#[tokio::test]
async fn photographer_may_submit_then_loses_write_access() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let picture = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();

  let submitted = h
    .flow
    .update_picture(
      &h.photographer,
      picture.picture_id,
      PicturePatch { state: Some(PictureState::Submitted), ..Default::default() },
    )
    .await
    .unwrap();
  assert_eq!(submitted.state, PictureState::Submitted);

  // Once out of draft/refused, the owner can no longer touch it.
  let err = h
    .flow
    .update_picture(
      &h.photographer,
      picture.picture_id,
      PicturePatch { file: Some("retake.jpg".into()), ..Default::default() },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
}

#[tokio::test]
async fn photographer_cannot_touch_another_owners_picture() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let mut new = new_picture(vp.viewpoint_id, day(10));
  new.state = Some(PictureState::Draft);
  let picture = h.flow.create_picture(&h.manager, new).await.unwrap();

  let err = h
    .flow
    .update_picture(
      &h.photographer,
      picture.picture_id,
      PicturePatch { file: Some("mine.jpg".into()), ..Default::default() },
    )
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
}

#[tokio::test]
async fn manager_created_picture_defaults_to_accepted_with_identifier() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let picture = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();

  assert_eq!(picture.state, PictureState::Accepted);
  // observatory 20, viewpoint 1, first by capture date
  assert_eq!(picture.identifier, Some(20000101));
}

#[tokio::test]
async fn identifier_rank_follows_capture_date_order() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let first = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(5)))
    .await
    .unwrap();
  let second = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(12)))
    .await
    .unwrap();

  assert_eq!(first.identifier, Some(20000101));
  assert_eq!(second.identifier, Some(20000102));
}

#[tokio::test]
async fn identifier_is_permanent_once_assigned() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let picture = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();
  let identifier = picture.identifier;
  assert!(identifier.is_some());

  // Shift the capture date to what would be a different rank; the
  // identifier must not move.
  let updated = h
    .flow
    .update_picture(
      &h.manager,
      picture.picture_id,
      PicturePatch { date: Some(day(1)), ..Default::default() },
    )
    .await
    .unwrap();
  assert_eq!(updated.identifier, identifier);
}

#[tokio::test]
async fn disabled_workflow_forces_acceptance() {
  let h = harness_with(false).await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let picture = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();
  assert_eq!(picture.state, PictureState::Accepted);
  assert!(picture.identifier.is_some());
}

// ─── Campaign aggregates & auto-close ────────────────────────────────────────

#[tokio::test]
async fn campaign_closes_when_every_viewpoint_is_accepted() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let picture = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();
  h.flow
    .update_picture(
      &h.photographer,
      picture.picture_id,
      PicturePatch { state: Some(PictureState::Submitted), ..Default::default() },
    )
    .await
    .unwrap();

  let accepted = h
    .flow
    .update_picture(
      &h.manager,
      picture.picture_id,
      PicturePatch { state: Some(PictureState::Accepted), ..Default::default() },
    )
    .await
    .unwrap();
  assert!(accepted.identifier.is_some());

  let campaign =
    h.flow.get_campaign(&h.manager, campaign.campaign_id).await.unwrap();
  assert_eq!(campaign.state, CampaignState::Closed);

  let stats = h.flow.campaign_statistics(campaign.campaign_id).await.unwrap();
  assert_eq!(stats.total, 1);
  assert_eq!(stats.accepted, 1);
  assert_eq!(stats.missing, 0);
}

#[tokio::test]
async fn partially_covered_campaign_stays_open() {
  let h = harness().await;
  let a = h.viewpoint("ridge").await;
  let b = h.viewpoint("quay").await;
  let campaign = h
    .campaign(&[a.viewpoint_id, b.viewpoint_id], march(1), CampaignState::Started)
    .await;

  let mut new = new_picture(a.viewpoint_id, day(10));
  new.campaign = Some(campaign.campaign_id);
  h.flow.create_picture(&h.manager, new).await.unwrap();

  let campaign =
    h.flow.get_campaign(&h.manager, campaign.campaign_id).await.unwrap();
  assert_eq!(campaign.state, CampaignState::Started);

  let stats = h.flow.campaign_statistics(campaign.campaign_id).await.unwrap();
  assert_eq!(stats.total, 2);
  assert_eq!(stats.accepted, 1);
  assert_eq!(stats.missing, 1);
  assert_eq!(stats.submitted + stats.accepted + stats.missing, stats.total);
}

#[tokio::test]
async fn refresh_of_closed_campaign_is_idempotent() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let mut new = new_picture(vp.viewpoint_id, day(10));
  new.campaign = Some(campaign.campaign_id);
  let picture = h.flow.create_picture(&h.manager, new).await.unwrap();

  let closed =
    h.flow.get_campaign(&h.manager, campaign.campaign_id).await.unwrap();
  assert_eq!(closed.state, CampaignState::Closed);

  // Another save against the closed campaign recomputes but never
  // re-transitions.
  h.flow
    .update_picture(
      &h.manager,
      picture.picture_id,
      PicturePatch { file: Some("retouched.jpg".into()), ..Default::default() },
    )
    .await
    .unwrap();
  let still =
    h.flow.get_campaign(&h.manager, campaign.campaign_id).await.unwrap();
  assert_eq!(still.state, CampaignState::Closed);
}

#[tokio::test]
async fn deleting_the_accepted_picture_does_not_reopen() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let mut new = new_picture(vp.viewpoint_id, day(10));
  new.campaign = Some(campaign.campaign_id);
  let picture = h.flow.create_picture(&h.manager, new).await.unwrap();

  h.flow.delete_picture(&h.manager, picture.picture_id).await.unwrap();

  let campaign =
    h.flow.get_campaign(&h.manager, campaign.campaign_id).await.unwrap();
  assert_eq!(campaign.state, CampaignState::Closed);

  let stats = h.flow.campaign_statistics(campaign.campaign_id).await.unwrap();
  assert_eq!(stats.accepted, 0);
  assert_eq!(stats.missing, 1);
}

#[tokio::test]
async fn failed_picture_write_rolls_back_campaign_transition() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  // A record violating the viewpoints foreign key fails mid-transaction;
  // the campaign transition bundled with it must not survive.
  let record = PictureRecord {
    owner:      h.photographer.actor_id,
    viewpoint:  9999,
    campaign:   Some(campaign.campaign_id),
    state:      PictureState::Accepted,
    identifier: None,
    date:       day(10),
    file:       "shot.jpg".into(),
    properties: json!({}),
  };
  let result = h
    .flow
    .store()
    .insert_picture(record, vec![(campaign.campaign_id, CampaignState::Closed)])
    .await;
  assert!(result.is_err());

  let after = h
    .flow
    .store()
    .get_campaign(campaign.campaign_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(after.state, CampaignState::Started);
}

#[tokio::test]
async fn manager_may_reopen_a_closed_campaign() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Closed).await;

  let reopened = h
    .flow
    .set_campaign_state(&h.manager, campaign.campaign_id, CampaignState::Started)
    .await
    .unwrap();
  assert_eq!(reopened.state, CampaignState::Started);

  let err = h
    .flow
    .set_campaign_state(&h.photographer, campaign.campaign_id, CampaignState::Closed)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
}

// ─── Campaign visibility ─────────────────────────────────────────────────────

#[tokio::test]
async fn photographer_sees_only_assigned_non_draft_campaigns() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Draft).await;
  h.campaign(&[vp.viewpoint_id], march(2), CampaignState::Started).await;
  h.campaign(&[vp.viewpoint_id], march(3), CampaignState::Closed).await;

  // Someone else's campaign, invisible to this photographer.
  h.flow
    .create_campaign(
      &h.manager,
      NewCampaign {
        label:      "other assignee".into(),
        start_date: march(4),
        assignee:   Uuid::new_v4(),
        state:      CampaignState::Started,
        viewpoints: vec![vp.viewpoint_id],
      },
    )
    .await
    .unwrap();

  let mine = h.flow.list_campaigns(&h.photographer).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert!(mine.iter().all(|c| c.assignee == h.photographer.actor_id));
  assert!(mine.iter().all(|c| c.state != CampaignState::Draft));

  let all = h.flow.list_campaigns(&h.manager).await.unwrap();
  assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn draft_campaign_is_hidden_from_its_assignee() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Draft).await;

  let err = h
    .flow
    .get_campaign(&h.photographer, campaign.campaign_id)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));

  assert!(h.flow.get_campaign(&h.manager, campaign.campaign_id).await.is_ok());
}

#[tokio::test]
async fn deleting_a_campaign_detaches_its_pictures() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  let campaign =
    h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  let picture = h
    .flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();
  assert_eq!(picture.campaign, Some(campaign.campaign_id));

  h.flow.delete_campaign(&h.manager, campaign.campaign_id).await.unwrap();

  let survivor = h.flow.get_picture(picture.picture_id).await.unwrap();
  assert!(survivor.campaign.is_none());
}

// ─── Thumbnails & derived views ──────────────────────────────────────────────

#[tokio::test]
async fn newest_picture_becomes_the_thumbnail() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let picture = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();

  assert_eq!(
    h.annotator.last(),
    Some(Annotation::Thumbnail(vp.viewpoint_id, picture.picture_id))
  );
}

#[tokio::test]
async fn deleting_the_newest_picture_repoints_the_thumbnail() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let older = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(5)))
    .await
    .unwrap();
  let newer = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(12)))
    .await
    .unwrap();

  h.flow.delete_picture(&h.manager, newer.picture_id).await.unwrap();
  assert_eq!(
    h.annotator.last(),
    Some(Annotation::Thumbnail(vp.viewpoint_id, older.picture_id))
  );

  h.flow.delete_picture(&h.manager, older.picture_id).await.unwrap();
  assert_eq!(h.annotator.last(), Some(Annotation::Cleared(vp.viewpoint_id)));
}

#[tokio::test]
async fn deleting_an_older_picture_keeps_the_thumbnail() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  let older = h
    .flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(5)))
    .await
    .unwrap();
  h.flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(12)))
    .await
    .unwrap();

  let before = h.annotator.events();
  h.flow.delete_picture(&h.manager, older.picture_id).await.unwrap();
  assert_eq!(h.annotator.events(), before);
}

#[tokio::test]
async fn summary_reflects_newest_picture_and_accepted_dates() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;

  h.flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(20)))
    .await
    .unwrap();
  let mut refused = new_picture(vp.viewpoint_id, day(25));
  refused.state = Some(PictureState::Refused);
  let newest = h.flow.create_picture(&h.manager, refused).await.unwrap();

  let summary = h.flow.get_viewpoint(vp.viewpoint_id).await.unwrap();
  assert_eq!(summary.status, ViewpointStatus::Refused);
  assert_eq!(
    summary.picture.as_ref().map(|p| p.picture_id),
    Some(newest.picture_id)
  );
  // Max capture date among accepted pictures only.
  assert_eq!(summary.last_accepted_picture_date, Some(day(20)));
}

#[tokio::test]
async fn last_accepted_date_requires_an_existing_viewpoint() {
  let h = harness().await;
  let err = h.flow.last_accepted_picture_date(42).await.unwrap_err();
  assert!(matches!(err, CoreError::ViewpointNotFound(42)));

  let vp = h.viewpoint("ridge").await;
  assert!(
    h.flow
      .last_accepted_picture_date(vp.viewpoint_id)
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Picture listings ────────────────────────────────────────────────────────

#[tokio::test]
async fn list_pictures_filters_by_state_and_owner() {
  let h = harness().await;
  let vp = h.viewpoint("ridge").await;
  h.campaign(&[vp.viewpoint_id], march(1), CampaignState::Started).await;

  h.flow
    .create_picture(&h.photographer, new_picture(vp.viewpoint_id, day(10)))
    .await
    .unwrap();
  h.flow
    .create_picture(&h.manager, new_picture(vp.viewpoint_id, day(11)))
    .await
    .unwrap();

  let s = h.flow.store();
  let drafts = s
    .list_pictures(PictureFilter {
      state: Some(PictureState::Draft),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(drafts.len(), 1);
  assert_eq!(drafts[0].owner, h.photographer.actor_id);

  let mine = s
    .list_pictures(PictureFilter {
      owner: Some(h.manager.actor_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].state, PictureState::Accepted);

  let everything = s.list_pictures(PictureFilter::default()).await.unwrap();
  assert_eq!(everything.len(), 2);
}
