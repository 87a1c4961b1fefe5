//! `deserialize_with` helpers.

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field from an explicit `null` in patch bodies:
/// absent deserializes to `None` (leave untouched), `null` to `Some(None)`
/// (detach). Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}
