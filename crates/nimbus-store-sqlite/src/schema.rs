//! SQL schema for the nimbus SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per client address, written on first sight and never updated.
CREATE TABLE IF NOT EXISTS geolocation (
    ip          TEXT PRIMARY KEY,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    city        TEXT NOT NULL,
    country     TEXT NOT NULL,
    region      TEXT NOT NULL,
    timezone    TEXT NOT NULL,   -- IANA identifier as reported upstream
    created_at  TEXT NOT NULL
);

-- Observations are strictly append-only.
CREATE TABLE IF NOT EXISTS observation (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    geolocation_ref    TEXT    NOT NULL REFERENCES geolocation(ip),
    temp_c             REAL    NOT NULL,
    temp_f             REAL    NOT NULL,
    relative_humidity  REAL    NOT NULL,
    rain               REAL    NOT NULL,
    snowfall           REAL    NOT NULL,
    weather_code       INTEGER NOT NULL,   -- WMO code, unvalidated
    timezone           TEXT    NOT NULL,   -- zone applied to time_local
    time_utc           TEXT    NOT NULL,   -- fixed-width RFC 3339, sortable
    time_local         TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS observation_drawing (
    drawing_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    observation_id      INTEGER NOT NULL REFERENCES observation(id),
    drawing_data_uri    TEXT    NOT NULL,
    drawing_size_bytes  INTEGER NOT NULL,
    recorded_at         TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS observation_location_time_idx
    ON observation(geolocation_ref, time_utc, id);
CREATE INDEX IF NOT EXISTS observation_drawing_observation_idx
    ON observation_drawing(observation_id);

PRAGMA user_version = 1;
";
