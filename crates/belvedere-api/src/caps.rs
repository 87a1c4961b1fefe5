//! Acting-identity extraction and the config-driven capability table.
//!
//! Accounts and authentication live in a fronting gateway; this layer trusts
//! the `x-actor-id` header it forwards and only answers capability questions
//! from the static grant table in the server configuration.

use std::collections::HashSet;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;
use uuid::Uuid;

use belvedere_core::actor::{Actor, ActorId, Capability, CapabilityCheck};

use crate::error::ApiError;

/// Header carrying the acting account's UUID.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor: the acting identity, taken from the [`ACTOR_HEADER`] header.
/// Missing or malformed headers reject with 401.
pub struct ActingAs(pub Actor);

impl<St: Send + Sync> FromRequestParts<St> for ActingAs {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    let raw = parts
      .headers
      .get(ACTOR_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| {
        ApiError::Unauthorized(format!("missing {ACTOR_HEADER} header"))
      })?;
    let actor_id = raw.parse::<Uuid>().map_err(|_| {
      ApiError::Unauthorized(format!("malformed {ACTOR_HEADER} header"))
    })?;
    Ok(ActingAs(Actor::new(actor_id)))
  }
}

// ─── Capability table ────────────────────────────────────────────────────────

/// Capability grants deserialised from server configuration. An actor listed
/// under `admins` holds every capability.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticCapabilities {
  #[serde(default)]
  pub admins:            HashSet<ActorId>,
  #[serde(default)]
  pub manage_pictures:   HashSet<ActorId>,
  #[serde(default)]
  pub add_pictures:      HashSet<ActorId>,
  #[serde(default)]
  pub manage_campaigns:  HashSet<ActorId>,
  #[serde(default)]
  pub manage_viewpoints: HashSet<ActorId>,
}

impl CapabilityCheck for StaticCapabilities {
  fn holds(&self, actor: &Actor, capability: Capability) -> bool {
    if self.admins.contains(&actor.actor_id) {
      return true;
    }
    let grants = match capability {
      Capability::ManagePictures => &self.manage_pictures,
      Capability::AddPictures => &self.add_pictures,
      Capability::ManageCampaigns => &self.manage_campaigns,
      Capability::ManageViewpoints => &self.manage_viewpoints,
    };
    grants.contains(&actor.actor_id)
  }
}
