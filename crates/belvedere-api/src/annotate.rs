//! [`TracingAnnotator`] — a point annotator for deployments where the
//! geographic feature layer is not wired up.
//!
//! Annotation decisions are still made by the engine in the usual order;
//! this implementation records them in the log instead of pushing them to an
//! external feature store.

use belvedere_core::{
  annotate::PointAnnotator, picture::Picture, viewpoint::Viewpoint,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnnotator;

impl PointAnnotator for TracingAnnotator {
  type Error = std::convert::Infallible;

  async fn annotate_viewpoint(
    &self,
    viewpoint: &Viewpoint,
  ) -> Result<(), Self::Error> {
    tracing::info!(
      viewpoint = viewpoint.viewpoint_id,
      point = %viewpoint.point,
      label = %viewpoint.label,
      "annotating viewpoint point"
    );
    Ok(())
  }

  async fn set_thumbnail(
    &self,
    viewpoint: &Viewpoint,
    picture: &Picture,
  ) -> Result<(), Self::Error> {
    tracing::info!(
      viewpoint = viewpoint.viewpoint_id,
      picture = picture.picture_id,
      "setting point thumbnail"
    );
    Ok(())
  }

  async fn clear_thumbnail(
    &self,
    viewpoint: &Viewpoint,
  ) -> Result<(), Self::Error> {
    tracing::info!(
      viewpoint = viewpoint.viewpoint_id,
      "clearing point thumbnail"
    );
    Ok(())
  }
}
