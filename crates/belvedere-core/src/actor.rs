//! Actors and the capability model.
//!
//! Accounts live in an external system; the engine only ever sees an opaque
//! actor id and asks a single injected interface whether that actor holds a
//! capability. Capabilities are a closed enum, not free-form strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to an externally-managed account.
pub type ActorId = Uuid;

/// An acting identity, as resolved by the surrounding transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub actor_id: ActorId,
}

impl Actor {
  pub fn new(actor_id: ActorId) -> Self { Self { actor_id } }
}

/// The closed set of capabilities the engine ever checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
  /// Administrative override on pictures: any state, any owner, no
  /// campaign-assignment checks.
  ManagePictures,
  /// The photographer role: may submit pictures under assigned campaigns.
  AddPictures,
  ManageCampaigns,
  ManageViewpoints,
}

/// Answers "does this actor hold capability C".
///
/// Implementations are expected to be cheap and infallible; an actor unknown
/// to the implementation simply holds nothing.
pub trait CapabilityCheck: Send + Sync {
  fn holds(&self, actor: &Actor, capability: Capability) -> bool;
}
