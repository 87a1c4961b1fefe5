//! [`SqliteStore`] — the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use belvedere_core::{
  actor::ActorId,
  campaign::{Campaign, CampaignId, CampaignState, NewCampaign},
  lookup::{City, Theme, canonical_label},
  picture::{Picture, PictureId},
  store::{ObservationStore, PictureFilter, PictureOrder, PictureRecord},
  viewpoint::{NewViewpoint, Viewpoint, ViewpointId},
};

use crate::{
  encode::{
    CAMPAIGN_COLUMNS, PICTURE_COLUMNS, RawCampaign, RawCity, RawPicture,
    RawTheme, RawViewpoint, encode_date, encode_dt, encode_properties,
    encode_uuid,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Belvedere entity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Campaign transitions riding in the same transaction as a picture write.
  fn apply_campaign_states(
    tx: &rusqlite::Transaction<'_>,
    transitions: &[(CampaignId, CampaignState)],
  ) -> rusqlite::Result<()> {
    for (id, state) in transitions {
      tx.execute(
        "UPDATE campaigns SET state = ?2 WHERE campaign_id = ?1",
        rusqlite::params![id, state.as_str()],
      )?;
    }
    Ok(())
  }

  /// Theme ids linked to a viewpoint, in a stable order.
  fn viewpoint_theme_ids(
    conn: &rusqlite::Connection,
    viewpoint_id: ViewpointId,
  ) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(
      "SELECT theme_id FROM viewpoint_themes
       WHERE viewpoint_id = ?1 ORDER BY theme_id",
    )?;
    stmt
      .query_map(rusqlite::params![viewpoint_id], |row| row.get(0))?
      .collect()
  }

}

const VIEWPOINT_COLUMNS: &str =
  "viewpoint_id, created_at, label, point, city_id, properties, active";

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = crate::Error;

  // ── Cities & themes ───────────────────────────────────────────────────

  async fn get_or_create_city(&self, label: &str) -> Result<City> {
    let canonical = canonical_label(label);
    let at_str = encode_dt(Utc::now());

    let raw: RawCity = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            "SELECT city_id, created_at, label FROM cities WHERE label = ?1",
            rusqlite::params![canonical],
            |row| {
              Ok(RawCity {
                city_id:    row.get(0)?,
                created_at: row.get(1)?,
                label:      row.get(2)?,
              })
            },
          )
          .optional()?;
        if let Some(raw) = existing {
          return Ok(raw);
        }

        conn.execute(
          "INSERT INTO cities (created_at, label) VALUES (?1, ?2)",
          rusqlite::params![at_str, canonical],
        )?;
        Ok(RawCity {
          city_id:    conn.last_insert_rowid(),
          created_at: at_str,
          label:      canonical,
        })
      })
      .await?;

    raw.into_city()
  }

  async fn find_city(&self, label: &str) -> Result<Option<City>> {
    let label = label.to_owned();

    let raw: Option<RawCity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT city_id, created_at, label FROM cities WHERE label = ?1",
              rusqlite::params![label],
              |row| {
                Ok(RawCity {
                  city_id:    row.get(0)?,
                  created_at: row.get(1)?,
                  label:      row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCity::into_city).transpose()
  }

  async fn list_cities(&self) -> Result<Vec<City>> {
    let raws: Vec<RawCity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT city_id, created_at, label FROM cities ORDER BY label",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCity {
              city_id:    row.get(0)?,
              created_at: row.get(1)?,
              label:      row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCity::into_city).collect()
  }

  async fn get_or_create_theme(&self, label: &str) -> Result<Theme> {
    let label = label.to_owned();
    let at_str = encode_dt(Utc::now());

    let raw: RawTheme = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            "SELECT theme_id, created_at, label FROM themes WHERE label = ?1",
            rusqlite::params![label],
            |row| {
              Ok(RawTheme {
                theme_id:   row.get(0)?,
                created_at: row.get(1)?,
                label:      row.get(2)?,
              })
            },
          )
          .optional()?;
        if let Some(raw) = existing {
          return Ok(raw);
        }

        conn.execute(
          "INSERT INTO themes (created_at, label) VALUES (?1, ?2)",
          rusqlite::params![at_str, label],
        )?;
        Ok(RawTheme {
          theme_id:   conn.last_insert_rowid(),
          created_at: at_str,
          label,
        })
      })
      .await?;

    raw.into_theme()
  }

  async fn list_themes(&self) -> Result<Vec<Theme>> {
    let raws: Vec<RawTheme> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT theme_id, created_at, label FROM themes ORDER BY label",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTheme {
              theme_id:   row.get(0)?,
              created_at: row.get(1)?,
              label:      row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTheme::into_theme).collect()
  }

  // ── Viewpoints ────────────────────────────────────────────────────────

  async fn add_viewpoint(&self, new: NewViewpoint) -> Result<Viewpoint> {
    let city_id = match &new.city {
      Some(label) => Some(self.get_or_create_city(label).await?.city_id),
      None => None,
    };

    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let properties_str = encode_properties(&new.properties)?;
    let label = new.label.clone();
    let point = new.point.clone();
    let themes = new.themes.clone();
    let active = new.active;

    let viewpoint_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO viewpoints (created_at, label, point, city_id, properties, active)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![at_str, label, point, city_id, properties_str, active],
        )?;
        let id = conn.last_insert_rowid();

        for theme in &themes {
          conn.execute(
            "INSERT OR IGNORE INTO viewpoint_themes (viewpoint_id, theme_id)
             VALUES (?1, ?2)",
            rusqlite::params![id, theme],
          )?;
        }
        Ok(id)
      })
      .await?;

    Ok(Viewpoint {
      viewpoint_id,
      created_at,
      label: new.label,
      point: new.point,
      city: city_id,
      themes: new.themes,
      properties: new.properties,
      active: new.active,
    })
  }

  async fn update_viewpoint(&self, viewpoint: &Viewpoint) -> Result<()> {
    let viewpoint_id = viewpoint.viewpoint_id;
    let label = viewpoint.label.clone();
    let point = viewpoint.point.clone();
    let city_id = viewpoint.city;
    let properties_str = encode_properties(&viewpoint.properties)?;
    let active = viewpoint.active;
    let themes = viewpoint.themes.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE viewpoints
           SET label = ?2, point = ?3, city_id = ?4, properties = ?5, active = ?6
           WHERE viewpoint_id = ?1",
          rusqlite::params![viewpoint_id, label, point, city_id, properties_str, active],
        )?;

        conn.execute(
          "DELETE FROM viewpoint_themes WHERE viewpoint_id = ?1",
          rusqlite::params![viewpoint_id],
        )?;
        for theme in &themes {
          conn.execute(
            "INSERT OR IGNORE INTO viewpoint_themes (viewpoint_id, theme_id)
             VALUES (?1, ?2)",
            rusqlite::params![viewpoint_id, theme],
          )?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_viewpoint(&self, id: ViewpointId) -> Result<Option<Viewpoint>> {
    let raw: Option<RawViewpoint> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {VIEWPOINT_COLUMNS} FROM viewpoints WHERE viewpoint_id = ?1");
        let base = conn
          .query_row(&sql, rusqlite::params![id], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, String>(2)?,
              row.get::<_, String>(3)?,
              row.get::<_, Option<i64>>(4)?,
              row.get::<_, String>(5)?,
              row.get::<_, bool>(6)?,
            ))
          })
          .optional()?;

        match base {
          None => Ok(None),
          Some((viewpoint_id, created_at, label, point, city_id, properties, active)) => {
            let themes = Self::viewpoint_theme_ids(conn, viewpoint_id)?;
            Ok(Some(RawViewpoint {
              viewpoint_id,
              created_at,
              label,
              point,
              city_id,
              properties,
              active,
              themes,
            }))
          }
        }
      })
      .await?;

    raw.map(RawViewpoint::into_viewpoint).transpose()
  }

  async fn list_viewpoints(&self, active_only: bool) -> Result<Vec<Viewpoint>> {
    let raws: Vec<RawViewpoint> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {VIEWPOINT_COLUMNS} FROM viewpoints
           {} ORDER BY created_at DESC, viewpoint_id DESC",
          if active_only { "WHERE active = 1" } else { "" },
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, String>(2)?,
              row.get::<_, String>(3)?,
              row.get::<_, Option<i64>>(4)?,
              row.get::<_, String>(5)?,
              row.get::<_, bool>(6)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut raws = Vec::with_capacity(rows.len());
        for (viewpoint_id, created_at, label, point, city_id, properties, active) in rows {
          raws.push(RawViewpoint {
            viewpoint_id,
            created_at,
            label,
            point,
            city_id,
            properties,
            active,
            themes: Self::viewpoint_theme_ids(conn, viewpoint_id)?,
          });
        }
        Ok(raws)
      })
      .await?;

    raws.into_iter().map(RawViewpoint::into_viewpoint).collect()
  }

  async fn delete_viewpoint(&self, id: ViewpointId) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM viewpoints WHERE viewpoint_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn last_accepted_picture_date(
    &self,
    id: ViewpointId,
  ) -> Result<Option<DateTime<Utc>>> {
    let max: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(date) FROM pictures
           WHERE viewpoint_id = ?1 AND state = 'accepted'",
          rusqlite::params![id],
          |row| row.get(0),
        )?)
      })
      .await?;

    max.as_deref().map(crate::encode::decode_dt).transpose()
  }

  // ── Campaigns ─────────────────────────────────────────────────────────

  async fn add_campaign(
    &self,
    owner: ActorId,
    new: NewCampaign,
  ) -> Result<Campaign> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let label = new.label.clone();
    let start_str = encode_date(new.start_date);
    let owner_str = encode_uuid(owner);
    let assignee_str = encode_uuid(new.assignee);
    let state_str = new.state.as_str();
    let viewpoints = new.viewpoints.clone();

    let campaign_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO campaigns (created_at, label, start_date, owner, assignee, state)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![at_str, label, start_str, owner_str, assignee_str, state_str],
        )?;
        let id = conn.last_insert_rowid();

        for viewpoint in &viewpoints {
          conn.execute(
            "INSERT OR IGNORE INTO campaign_viewpoints (campaign_id, viewpoint_id)
             VALUES (?1, ?2)",
            rusqlite::params![id, viewpoint],
          )?;
        }
        Ok(id)
      })
      .await?;

    Ok(Campaign {
      campaign_id,
      created_at,
      label: new.label,
      start_date: new.start_date,
      owner,
      assignee: new.assignee,
      state: new.state,
    })
  }

  async fn get_campaign(&self, id: CampaignId) -> Result<Option<Campaign>> {
    let raw: Option<RawCampaign> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE campaign_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawCampaign::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCampaign::into_campaign).transpose()
  }

  async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
    let raws: Vec<RawCampaign> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {CAMPAIGN_COLUMNS} FROM campaigns
           ORDER BY start_date DESC, created_at DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCampaign::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCampaign::into_campaign).collect()
  }

  async fn list_campaigns_for_assignee(
    &self,
    assignee: ActorId,
    states: &[CampaignState],
  ) -> Result<Vec<Campaign>> {
    let assignee_str = encode_uuid(assignee);
    // The state set is a closed enum; inlining its discriminants is safe.
    let state_list = states
      .iter()
      .map(|s| format!("'{}'", s.as_str()))
      .collect::<Vec<_>>()
      .join(", ");

    let raws: Vec<RawCampaign> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CAMPAIGN_COLUMNS} FROM campaigns
           WHERE assignee = ?1 AND state IN ({state_list})
           ORDER BY start_date DESC, created_at DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![assignee_str], RawCampaign::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCampaign::into_campaign).collect()
  }

  async fn set_campaign_state(
    &self,
    id: CampaignId,
    state: CampaignState,
  ) -> Result<()> {
    let state_str = state.as_str();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE campaigns SET state = ?2 WHERE campaign_id = ?1",
          rusqlite::params![id, state_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn campaign_viewpoints(&self, id: CampaignId) -> Result<Vec<ViewpointId>> {
    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT viewpoint_id FROM campaign_viewpoints
           WHERE campaign_id = ?1 ORDER BY viewpoint_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }

  async fn started_campaigns_for(
    &self,
    assignee: ActorId,
    viewpoint: ViewpointId,
  ) -> Result<Vec<Campaign>> {
    let assignee_str = encode_uuid(assignee);

    // The join brings in a second campaign_id, so the select list has to be
    // qualified.
    let columns = CAMPAIGN_COLUMNS
      .split(", ")
      .map(|column| format!("c.{column}"))
      .collect::<Vec<_>>()
      .join(", ");

    let raws: Vec<RawCampaign> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {columns} FROM campaigns c
           JOIN campaign_viewpoints cv ON cv.campaign_id = c.campaign_id
           WHERE c.assignee = ?1 AND c.state = 'started' AND cv.viewpoint_id = ?2
           ORDER BY c.start_date ASC, c.campaign_id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![assignee_str, viewpoint],
            RawCampaign::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCampaign::into_campaign).collect()
  }

  async fn delete_campaign(&self, id: CampaignId) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM campaigns WHERE campaign_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }

  // ── Pictures ──────────────────────────────────────────────────────────

  async fn insert_picture(
    &self,
    record: PictureRecord,
    campaign_states: Vec<(CampaignId, CampaignState)>,
  ) -> Result<Picture> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let owner_str = encode_uuid(record.owner);
    let viewpoint = record.viewpoint;
    let campaign = record.campaign;
    let state_str = record.state.as_str();
    let identifier = record.identifier;
    let date_str = encode_dt(record.date);
    let file = record.file.clone();
    let properties_str = encode_properties(&record.properties)?;

    let picture_id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        Self::apply_campaign_states(&tx, &campaign_states)?;
        tx.execute(
          "INSERT INTO pictures (created_at, owner, viewpoint_id, campaign_id,
             state, identifier, date, file, properties)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            at_str,
            owner_str,
            viewpoint,
            campaign,
            state_str,
            identifier,
            date_str,
            file,
            properties_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(Picture {
      picture_id,
      owner: record.owner,
      viewpoint: record.viewpoint,
      campaign: record.campaign,
      state: record.state,
      identifier: record.identifier,
      date: record.date,
      created_at,
      file: record.file,
      properties: record.properties,
    })
  }

  async fn update_picture(
    &self,
    picture: &Picture,
    campaign_states: Vec<(CampaignId, CampaignState)>,
  ) -> Result<()> {
    let picture_id = picture.picture_id;
    let owner_str = encode_uuid(picture.owner);
    let campaign = picture.campaign;
    let state_str = picture.state.as_str();
    let identifier = picture.identifier;
    let date_str = encode_dt(picture.date);
    let file = picture.file.clone();
    let properties_str = encode_properties(&picture.properties)?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        Self::apply_campaign_states(&tx, &campaign_states)?;
        tx.execute(
          "UPDATE pictures
           SET owner = ?2, campaign_id = ?3, state = ?4, identifier = ?5,
               date = ?6, file = ?7, properties = ?8
           WHERE picture_id = ?1",
          rusqlite::params![
            picture_id,
            owner_str,
            campaign,
            state_str,
            identifier,
            date_str,
            file,
            properties_str,
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_picture(&self, id: PictureId) -> Result<Option<Picture>> {
    let raw: Option<RawPicture> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {PICTURE_COLUMNS} FROM pictures WHERE picture_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawPicture::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPicture::into_picture).transpose()
  }

  async fn delete_picture(
    &self,
    id: PictureId,
    campaign_states: Vec<(CampaignId, CampaignState)>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        Self::apply_campaign_states(&tx, &campaign_states)?;
        tx.execute(
          "DELETE FROM pictures WHERE picture_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn viewpoint_pictures(
    &self,
    viewpoint: ViewpointId,
    order: PictureOrder,
  ) -> Result<Vec<Picture>> {
    // Id is the tie-break so same-timestamp inserts stay deterministic.
    let ordering = match order {
      PictureOrder::NewestFirst => "created_at DESC, picture_id DESC",
      PictureOrder::ByCaptureDate => "date ASC, picture_id ASC",
    };

    let raws: Vec<RawPicture> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PICTURE_COLUMNS} FROM pictures
           WHERE viewpoint_id = ?1 ORDER BY {ordering}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![viewpoint], RawPicture::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPicture::into_picture).collect()
  }

  async fn campaign_pictures(&self, campaign: CampaignId) -> Result<Vec<Picture>> {
    let raws: Vec<RawPicture> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PICTURE_COLUMNS} FROM pictures
           WHERE campaign_id = ?1 ORDER BY created_at DESC, picture_id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![campaign], RawPicture::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPicture::into_picture).collect()
  }

  async fn picture_exists(
    &self,
    viewpoint: ViewpointId,
    campaign: CampaignId,
  ) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM pictures
               WHERE viewpoint_id = ?1 AND campaign_id = ?2 LIMIT 1",
              rusqlite::params![viewpoint, campaign],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn list_pictures(&self, filter: PictureFilter) -> Result<Vec<Picture>> {
    let viewpoint = filter.viewpoint;
    let campaign = filter.campaign;
    let state_str = filter.state.map(|s| s.as_str());
    let owner_str = filter.owner.map(encode_uuid);

    let raws: Vec<RawPicture> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PICTURE_COLUMNS} FROM pictures
           WHERE (?1 IS NULL OR viewpoint_id = ?1)
             AND (?2 IS NULL OR campaign_id = ?2)
             AND (?3 IS NULL OR state = ?3)
             AND (?4 IS NULL OR owner = ?4)
           ORDER BY created_at DESC, picture_id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![viewpoint, campaign, state_str, owner_str],
            RawPicture::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPicture::into_picture).collect()
  }
}
