//! JSON REST API for Belvedere.
//!
//! Exposes an axum [`Router`] over a [`belvedere_core::workflow::Workflow`]
//! wired to any [`ObservationStore`], [`CapabilityCheck`] and
//! [`PointAnnotator`]. Authentication is the fronting gateway's concern; the
//! acting identity arrives as the `x-actor-id` header.

pub mod annotate;
pub mod campaigns;
pub mod caps;
pub mod error;
pub mod lookups;
pub mod pictures;
pub mod viewpoints;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, put},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use belvedere_core::{
  actor::CapabilityCheck, annotate::PointAnnotator, store::ObservationStore,
  workflow::Workflow,
};

pub use caps::StaticCapabilities;
pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `BELVEDERE_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Leading component of picture identifiers.
  pub observatory_id:    u32,
  #[serde(default = "default_pictures_workflow")]
  pub pictures_workflow: bool,
  #[serde(default)]
  pub capabilities:      StaticCapabilities,
}

fn default_pictures_workflow() -> bool { true }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C, A> {
  pub flow: Arc<Workflow<S, C, A>>,
}

impl<S, C, A> Clone for AppState<S, C, A> {
  fn clone(&self) -> Self { Self { flow: Arc::clone(&self.flow) } }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S, C, A>(state: AppState<S, C, A>) -> Router
where
  S: ObservationStore + 'static,
  C: CapabilityCheck + 'static,
  A: PointAnnotator + 'static,
{
  Router::new()
    // Pictures
    .route(
      "/pictures",
      get(pictures::list::<S, C, A>).post(pictures::create::<S, C, A>),
    )
    .route(
      "/pictures/{id}",
      get(pictures::get_one::<S, C, A>)
        .put(pictures::update::<S, C, A>)
        .delete(pictures::delete::<S, C, A>),
    )
    // Campaigns
    .route(
      "/campaigns",
      get(campaigns::list::<S, C, A>).post(campaigns::create::<S, C, A>),
    )
    .route(
      "/campaigns/{id}",
      get(campaigns::get_one::<S, C, A>).delete(campaigns::delete::<S, C, A>),
    )
    .route("/campaigns/{id}/state", put(campaigns::set_state::<S, C, A>))
    // Viewpoints
    .route(
      "/viewpoints",
      get(viewpoints::list::<S, C, A>).post(viewpoints::create::<S, C, A>),
    )
    .route(
      "/viewpoints/{id}",
      get(viewpoints::get_one::<S, C, A>)
        .put(viewpoints::update::<S, C, A>)
        .delete(viewpoints::delete::<S, C, A>),
    )
    // Lookups
    .route(
      "/cities",
      get(lookups::list_cities::<S, C, A>).post(lookups::create_city::<S, C, A>),
    )
    .route(
      "/themes",
      get(lookups::list_themes::<S, C, A>).post(lookups::create_theme::<S, C, A>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use belvedere_core::workflow::ObservatoryConfig;
  use belvedere_store_sqlite::SqliteStore;

  use super::*;
  use crate::{annotate::TracingAnnotator, caps::StaticCapabilities};

  struct TestApp {
    router:       Router,
    admin:        Uuid,
    photographer: Uuid,
  }

  async fn app() -> TestApp {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let admin = Uuid::new_v4();
    let photographer = Uuid::new_v4();
    let caps = StaticCapabilities {
      admins: HashSet::from([admin]),
      add_pictures: HashSet::from([photographer]),
      ..Default::default()
    };
    let flow = Workflow::new(
      store,
      caps,
      TracingAnnotator,
      ObservatoryConfig { observatory_id: 20, pictures_workflow: true },
    );
    TestApp {
      router: router(AppState { flow: Arc::new(flow) }),
      admin,
      photographer,
    }
  }

  async fn send(
    router: Router,
    method: &str,
    uri: &str,
    actor: Option<Uuid>,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
      builder = builder.header("x-actor-id", actor.to_string());
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router.oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes =
      axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn viewpoint_body(label: &str) -> Value {
    json!({ "label": label, "point": format!("features/{label}") })
  }

  fn picture_body(viewpoint: i64) -> Value {
    json!({
      "viewpoint": viewpoint,
      "date":      "2024-03-10T12:00:00Z",
      "file":      "shot.jpg",
    })
  }

  // ── Identity ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_actor_header_is_401() {
    let app = app().await;
    let resp = send(
      app.router,
      "POST",
      "/pictures",
      None,
      Some(picture_body(1)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn malformed_actor_header_is_401() {
    let app = app().await;
    let req = Request::builder()
      .method("GET")
      .uri("/campaigns")
      .header("x-actor-id", "not-a-uuid")
      .body(Body::empty())
      .unwrap();
    let resp = app.router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Viewpoints ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_creates_and_lists_viewpoints() {
    let app = app().await;

    let resp = send(
      app.router.clone(),
      "POST",
      "/viewpoints",
      Some(app.admin),
      Some(viewpoint_body("ridge")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(app.router, "GET", "/viewpoints", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["status"], "missing");
  }

  #[tokio::test]
  async fn photographer_cannot_create_viewpoints() {
    let app = app().await;
    let resp = send(
      app.router,
      "POST",
      "/viewpoints",
      Some(app.photographer),
      Some(viewpoint_body("ridge")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  // ── Pictures ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn photographer_without_campaign_gets_400() {
    let app = app().await;

    let resp = send(
      app.router.clone(),
      "POST",
      "/viewpoints",
      Some(app.admin),
      Some(viewpoint_body("ridge")),
    )
    .await;
    let viewpoint = json_body(resp).await["viewpoint_id"].as_i64().unwrap();

    let resp = send(
      app.router,
      "POST",
      "/pictures",
      Some(app.photographer),
      Some(picture_body(viewpoint)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn photographer_submission_resolves_campaign() {
    let app = app().await;

    let resp = send(
      app.router.clone(),
      "POST",
      "/viewpoints",
      Some(app.admin),
      Some(viewpoint_body("ridge")),
    )
    .await;
    let viewpoint = json_body(resp).await["viewpoint_id"].as_i64().unwrap();

    let resp = send(
      app.router.clone(),
      "POST",
      "/campaigns",
      Some(app.admin),
      Some(json!({
        "label":      "spring survey",
        "start_date": "2024-03-01",
        "assignee":   app.photographer,
        "state":      "started",
        "viewpoints": [viewpoint],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let campaign = json_body(resp).await["campaign_id"].as_i64().unwrap();

    let resp = send(
      app.router,
      "POST",
      "/pictures",
      Some(app.photographer),
      Some(picture_body(viewpoint)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["state"], "draft");
    assert_eq!(body["campaign"].as_i64(), Some(campaign));
  }

  #[tokio::test]
  async fn unknown_state_filter_is_400() {
    let app = app().await;
    let resp =
      send(app.router, "GET", "/pictures?state=pending", None, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn missing_picture_is_404() {
    let app = app().await;
    let resp = send(app.router, "GET", "/pictures/999", None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Campaigns ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn campaign_detail_embeds_statistics() {
    let app = app().await;

    let resp = send(
      app.router.clone(),
      "POST",
      "/campaigns",
      Some(app.admin),
      Some(json!({
        "label":      "empty survey",
        "start_date": "2024-03-01",
        "assignee":   app.photographer,
        "state":      "started",
      })),
    )
    .await;
    let id = json_body(resp).await["campaign_id"].as_i64().unwrap();

    let resp = send(
      app.router,
      "GET",
      &format!("/campaigns/{id}"),
      Some(app.admin),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["statistics"]["total"], 0);
    assert_eq!(body["statistics"]["missing"], 0);
  }

  // ── Lookups ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn posted_city_labels_are_canonicalized() {
    let app = app().await;

    let resp = send(
      app.router.clone(),
      "POST",
      "/cities",
      Some(app.admin),
      Some(json!({ "label": "LYON" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["label"], "Lyon");

    let resp = send(app.router, "GET", "/cities", None, None).await;
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }
}
