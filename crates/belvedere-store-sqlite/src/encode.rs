//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601.
//! State enums are stored as their discriminant strings, JSON properties as
//! compact JSON text. Actor UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use belvedere_core::{
  campaign::{Campaign, CampaignState},
  lookup::{City, Theme, ThemeId},
  picture::{Picture, PictureState},
  viewpoint::Viewpoint,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── States ──────────────────────────────────────────────────────────────────

pub fn decode_picture_state(s: &str) -> Result<PictureState> {
  Ok(PictureState::parse(s)?)
}

pub fn decode_campaign_state(s: &str) -> Result<CampaignState> {
  Ok(CampaignState::parse(s)?)
}

// ─── Properties ──────────────────────────────────────────────────────────────

pub fn encode_properties(v: &serde_json::Value) -> Result<String> {
  Ok(serde_json::to_string(v)?)
}

pub fn decode_properties(s: &str) -> Result<serde_json::Value> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPicture::from_row`].
pub const PICTURE_COLUMNS: &str = "picture_id, created_at, owner, \
  viewpoint_id, campaign_id, state, identifier, date, file, properties";

/// Raw strings read directly from a `pictures` row.
pub struct RawPicture {
  pub picture_id:   i64,
  pub created_at:   String,
  pub owner:        String,
  pub viewpoint_id: i64,
  pub campaign_id:  Option<i64>,
  pub state:        String,
  pub identifier:   Option<i64>,
  pub date:         String,
  pub file:         String,
  pub properties:   String,
}

impl RawPicture {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      picture_id:   row.get(0)?,
      created_at:   row.get(1)?,
      owner:        row.get(2)?,
      viewpoint_id: row.get(3)?,
      campaign_id:  row.get(4)?,
      state:        row.get(5)?,
      identifier:   row.get(6)?,
      date:         row.get(7)?,
      file:         row.get(8)?,
      properties:   row.get(9)?,
    })
  }

  pub fn into_picture(self) -> Result<Picture> {
    Ok(Picture {
      picture_id: self.picture_id,
      owner:      decode_uuid(&self.owner)?,
      viewpoint:  self.viewpoint_id,
      campaign:   self.campaign_id,
      state:      decode_picture_state(&self.state)?,
      identifier: self.identifier,
      date:       decode_dt(&self.date)?,
      created_at: decode_dt(&self.created_at)?,
      file:       self.file,
      properties: decode_properties(&self.properties)?,
    })
  }
}

/// Column list matching [`RawCampaign::from_row`].
pub const CAMPAIGN_COLUMNS: &str =
  "campaign_id, created_at, label, start_date, owner, assignee, state";

/// Raw strings read directly from a `campaigns` row.
pub struct RawCampaign {
  pub campaign_id: i64,
  pub created_at:  String,
  pub label:       String,
  pub start_date:  String,
  pub owner:       String,
  pub assignee:    String,
  pub state:       String,
}

impl RawCampaign {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      campaign_id: row.get(0)?,
      created_at:  row.get(1)?,
      label:       row.get(2)?,
      start_date:  row.get(3)?,
      owner:       row.get(4)?,
      assignee:    row.get(5)?,
      state:       row.get(6)?,
    })
  }

  pub fn into_campaign(self) -> Result<Campaign> {
    Ok(Campaign {
      campaign_id: self.campaign_id,
      created_at:  decode_dt(&self.created_at)?,
      label:       self.label,
      start_date:  decode_date(&self.start_date)?,
      owner:       decode_uuid(&self.owner)?,
      assignee:    decode_uuid(&self.assignee)?,
      state:       decode_campaign_state(&self.state)?,
    })
  }
}

/// Raw strings read directly from a `viewpoints` row; themes come from a
/// second query against the link table.
pub struct RawViewpoint {
  pub viewpoint_id: i64,
  pub created_at:   String,
  pub label:        String,
  pub point:        String,
  pub city_id:      Option<i64>,
  pub properties:   String,
  pub active:       bool,
  pub themes:       Vec<ThemeId>,
}

impl RawViewpoint {
  pub fn into_viewpoint(self) -> Result<Viewpoint> {
    Ok(Viewpoint {
      viewpoint_id: self.viewpoint_id,
      created_at:   decode_dt(&self.created_at)?,
      label:        self.label,
      point:        self.point,
      city:         self.city_id,
      themes:       self.themes,
      properties:   decode_properties(&self.properties)?,
      active:       self.active,
    })
  }
}

/// Raw strings read directly from a `cities` row.
pub struct RawCity {
  pub city_id:    i64,
  pub created_at: String,
  pub label:      String,
}

impl RawCity {
  pub fn into_city(self) -> Result<City> {
    Ok(City {
      city_id:    self.city_id,
      created_at: decode_dt(&self.created_at)?,
      label:      self.label,
    })
  }
}

/// Raw strings read directly from a `themes` row.
pub struct RawTheme {
  pub theme_id:   i64,
  pub created_at: String,
  pub label:      String,
}

impl RawTheme {
  pub fn into_theme(self) -> Result<Theme> {
    Ok(Theme {
      theme_id:   self.theme_id,
      created_at: decode_dt(&self.created_at)?,
      label:      self.label,
    })
  }
}
