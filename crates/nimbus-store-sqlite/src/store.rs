//! [`SqliteStore`], the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use nimbus_core::{
  geolocation::Geolocation,
  observation::{NewDrawing, NewObservation, Observation, ObservationDrawing},
  store::{InsertOutcome, ObservationStore},
};

use crate::{
  Result,
  encode::{OBSERVATION_COLUMNS, RawObservation, encode_fixed, encode_utc},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An observation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialised onto the connection's thread.
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

  /// Open an in-memory store, for tests.
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

  async fn query_observation(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Option<Observation>> {
    let raw: Option<RawObservation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawObservation::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawObservation::into_observation).transpose()
  }
}

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = crate::Error;

  // ── Geolocations ──────────────────────────────────────────────────────────

  async fn get_geolocation(&self, address: &str) -> Result<Option<Geolocation>> {
    let ip = address.to_owned();

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT ip, latitude, longitude, city, country, region, timezone
               FROM geolocation WHERE ip = ?1",
              rusqlite::params![ip],
              |row| {
                Ok(Geolocation {
                  address:   row.get(0)?,
                  latitude:  row.get(1)?,
                  longitude: row.get(2)?,
                  city:      row.get(3)?,
                  country:   row.get(4)?,
                  region:    row.get(5)?,
                  timezone:  row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row)
  }

  async fn insert_geolocation(&self, geolocation: Geolocation) -> Result<InsertOutcome> {
    let created_at = encode_utc(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO geolocation (
             ip, latitude, longitude, city, country, region, timezone, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT (ip) DO NOTHING",
          rusqlite::params![
            geolocation.address,
            geolocation.latitude,
            geolocation.longitude,
            geolocation.city,
            geolocation.country,
            geolocation.region,
            geolocation.timezone,
            created_at,
          ],
        )?;
        Ok(changed)
      })
      .await?;

    Ok(if changed == 0 {
      InsertOutcome::AlreadyPresent
    } else {
      InsertOutcome::Inserted
    })
  }

  // ── Observations ──────────────────────────────────────────────────────────

  async fn record_observation(&self, input: NewObservation) -> Result<Observation> {
    let time_utc   = encode_utc(input.time_utc);
    let time_local = encode_fixed(input.time_local);
    let row        = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO observation (
             geolocation_ref, temp_c, temp_f, relative_humidity, rain,
             snowfall, weather_code, timezone, time_utc, time_local
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            row.address,
            row.temp_c,
            row.temp_f,
            row.relative_humidity,
            row.rain,
            row.snowfall,
            row.weather_code.0,
            row.timezone,
            time_utc,
            time_local,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::trace!(id, "inserted observation row");
    Ok(input.into_observation(id))
  }

  async fn get_observation(&self, id: i64) -> Result<Option<Observation>> {
    self
      .query_observation(
        format!("SELECT {OBSERVATION_COLUMNS} FROM observation WHERE id = ?1"),
        vec![id.into()],
      )
      .await
  }

  async fn prior_observation(&self, current: &Observation) -> Result<Option<Observation>> {
    self
      .query_observation(
        format!(
          "SELECT {OBSERVATION_COLUMNS} FROM observation
           WHERE geolocation_ref = ?1 AND time_utc < ?2
           ORDER BY time_utc DESC, id ASC
           LIMIT 1"
        ),
        vec![current.address.clone().into(), encode_utc(current.time_utc).into()],
      )
      .await
  }

  // ── Drawings ──────────────────────────────────────────────────────────────

  async fn attach_drawing(
    &self,
    observation_id: i64,
    drawing: NewDrawing,
  ) -> Result<Option<ObservationDrawing>> {
    let recorded_at = Utc::now();
    let row = ObservationDrawing {
      observation_id,
      size_bytes: drawing.size_bytes(),
      data_uri: drawing.data_uri,
      recorded_at,
    };
    let insert = row.clone();
    let at_str = encode_utc(recorded_at);

    let attached = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM observation WHERE id = ?1",
            rusqlite::params![observation_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO observation_drawing (
             observation_id, drawing_data_uri, drawing_size_bytes, recorded_at
           ) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            insert.observation_id,
            insert.data_uri,
            insert.size_bytes,
            at_str,
          ],
        )?;
        Ok(true)
      })
      .await?;

    Ok(attached.then_some(row))
  }
}
