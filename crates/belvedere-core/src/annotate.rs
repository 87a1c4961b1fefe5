//! The `PointAnnotator` trait — the seam to the externally-owned geographic
//! feature layer.
//!
//! Thumbnail rendering and feature storage are external collaborators; the
//! engine only decides *when* an annotation changes and delegates the rest.
//! These hooks are invoked explicitly after a successful persist, in order,
//! rather than through any implicit event bus.

use std::future::Future;

use crate::{picture::Picture, viewpoint::Viewpoint};

pub trait PointAnnotator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Push the viewpoint's identity properties (id, label, city, active flag)
  /// onto its geographic point. Called after viewpoint create/update.
  fn annotate_viewpoint(
    &self,
    viewpoint: &Viewpoint,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Point the viewpoint's thumbnail annotation at this picture.
  fn set_thumbnail(
    &self,
    viewpoint: &Viewpoint,
    picture: &Picture,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Remove the thumbnail annotation entirely (no pictures remain).
  fn clear_thumbnail(
    &self,
    viewpoint: &Viewpoint,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
