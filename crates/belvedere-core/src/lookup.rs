//! City and Theme — simple labelled lookup entities.
//!
//! City labels are always stored in canonical capitalized form, so
//! "MARSEILLE" and "marseille" both resolve (or create) "Marseille".
//! Lookups are exact matches against that canonical form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type CityId = i64;
pub type ThemeId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
  pub city_id:    CityId,
  pub created_at: DateTime<Utc>,
  /// Always the canonical capitalized form.
  pub label:      String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
  pub theme_id:   ThemeId,
  pub created_at: DateTime<Utc>,
  pub label:      String,
}

/// Canonical form of a city label: first character uppercased, the rest
/// lowercased.
pub fn canonical_label(label: &str) -> String {
  let mut chars = label.chars();
  match chars.next() {
    Some(first) => {
      first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    }
    None => String::new(),
  }
}
