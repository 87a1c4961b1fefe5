//! Error types for `belvedere-core`.
//!
//! The distinction between [`Error::Forbidden`] and a validation problem is
//! load-bearing: a photographer touching a picture outside their permitted
//! source states is a permission failure, while an over-privileged target
//! state in the same request is silently clamped and is not an error at all.

use thiserror::Error;

use crate::{campaign::CampaignId, picture::PictureId, viewpoint::ViewpointId};

#[derive(Debug, Error)]
pub enum Error {
  /// The actor lacks the capability for the operation, or attempted to
  /// mutate a picture outside the source states their role permits.
  #[error("forbidden")]
  Forbidden,

  /// No campaign could be resolved for a photographer's new picture: none
  /// named and no eligible assignment, or the named one is not started, not
  /// assigned to the actor, or does not include the viewpoint.
  #[error("no valid campaign found to add picture")]
  CampaignNotFound,

  /// A picture already exists for this (viewpoint, campaign) pair.
  #[error("picture already exists for this viewpoint in that campaign")]
  PictureAlreadyExists,

  #[error("picture not found: {0}")]
  PictureNotFound(PictureId),

  #[error("viewpoint not found: {0}")]
  ViewpointNotFound(ViewpointId),

  #[error("campaign not found: {0}")]
  CampaignMissing(CampaignId),

  #[error("validation error: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("annotation error: {0}")]
  Annotation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a storage-backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Wrap a point-annotator error. Annotation failures are fatal to the
  /// enclosing operation so picture state and derived views stay consistent.
  pub fn annotation<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Annotation(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
