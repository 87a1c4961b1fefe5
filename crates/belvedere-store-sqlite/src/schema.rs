//! SQL schema for the Belvedere SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cities (
    city_id     INTEGER PRIMARY KEY,
    created_at  TEXT NOT NULL,
    label       TEXT NOT NULL UNIQUE    -- canonical capitalized form
);

CREATE TABLE IF NOT EXISTS themes (
    theme_id    INTEGER PRIMARY KEY,
    created_at  TEXT NOT NULL,
    label       TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS viewpoints (
    viewpoint_id INTEGER PRIMARY KEY,
    created_at   TEXT NOT NULL,
    label        TEXT NOT NULL,
    point        TEXT NOT NULL,         -- reference to the external feature
    city_id      INTEGER REFERENCES cities(city_id) ON DELETE SET NULL,
    properties   TEXT NOT NULL DEFAULT '{}',
    active       INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS viewpoint_themes (
    viewpoint_id INTEGER NOT NULL REFERENCES viewpoints(viewpoint_id) ON DELETE CASCADE,
    theme_id     INTEGER NOT NULL REFERENCES themes(theme_id) ON DELETE CASCADE,
    PRIMARY KEY (viewpoint_id, theme_id)
);

CREATE TABLE IF NOT EXISTS campaigns (
    campaign_id INTEGER PRIMARY KEY,
    created_at  TEXT NOT NULL,
    label       TEXT NOT NULL,
    start_date  TEXT NOT NULL,          -- ISO 8601 calendar date
    owner       TEXT NOT NULL,          -- actor uuid
    assignee    TEXT NOT NULL,          -- actor uuid
    state       TEXT NOT NULL DEFAULT 'draft'
);

CREATE TABLE IF NOT EXISTS campaign_viewpoints (
    campaign_id  INTEGER NOT NULL REFERENCES campaigns(campaign_id) ON DELETE CASCADE,
    viewpoint_id INTEGER NOT NULL REFERENCES viewpoints(viewpoint_id) ON DELETE CASCADE,
    PRIMARY KEY (campaign_id, viewpoint_id)
);

-- NULL campaign_id rows are exempt from the UNIQUE rule (NULLs are distinct
-- in SQLite unique indexes): at most one picture per (viewpoint, campaign)
-- only when a campaign is set.
CREATE TABLE IF NOT EXISTS pictures (
    picture_id   INTEGER PRIMARY KEY,
    created_at   TEXT NOT NULL,         -- upload timestamp, server-assigned
    owner        TEXT NOT NULL,         -- actor uuid
    viewpoint_id INTEGER NOT NULL REFERENCES viewpoints(viewpoint_id) ON DELETE CASCADE,
    campaign_id  INTEGER REFERENCES campaigns(campaign_id) ON DELETE SET NULL,
    state        TEXT NOT NULL DEFAULT 'draft',
    identifier   INTEGER,               -- permanent once assigned
    date         TEXT NOT NULL,         -- capture date
    file         TEXT NOT NULL,
    properties   TEXT NOT NULL DEFAULT '{}',
    UNIQUE (viewpoint_id, campaign_id)
);

-- Capture-date ordering drives identifier ranks; keep it indexed.
CREATE INDEX IF NOT EXISTS pictures_viewpoint_date_idx ON pictures(viewpoint_id, date);
CREATE INDEX IF NOT EXISTS pictures_campaign_idx       ON pictures(campaign_id);
CREATE INDEX IF NOT EXISTS pictures_state_idx          ON pictures(state);

PRAGMA user_version = 1;
";
