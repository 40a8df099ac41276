//! [`SqliteStore`] — the SQLite implementation of [`CheckinStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use comedor_core::{
  attendance::{MealAttendance, MealCategory, NewMealAttendance},
  guest::{Guest, NewGuest},
  store::{CheckinStore, RecordOutcome},
};
use uuid::Uuid;

use crate::{
  encode::{
    RawAttendance, RawGuest, encode_category, encode_date, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Comedor check-in store backed by a single SQLite file.
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
}

/// Whether `err` is a violation of the one-guest-meal-per-day unique index.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── CheckinStore impl ───────────────────────────────────────────────────────

impl CheckinStore for SqliteStore {
  type Error = Error;

  // ── Guest directory ───────────────────────────────────────────────────────

  async fn add_guest(&self, input: NewGuest) -> Result<Guest> {
    let guest = Guest {
      id:             Uuid::new_v4(),
      external_id:    input.external_id,
      first_name:     input.first_name,
      last_name:      input.last_name,
      full_name:      input.full_name,
      preferred_name: input.preferred_name,
      housing_status: input.housing_status,
      age_group:      input.age_group,
      gender:         input.gender,
    };

    let row = guest.clone();
    let id_str = encode_uuid(guest.id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO guests (
             id, external_id, first_name, last_name, full_name,
             preferred_name, housing_status, age_group, gender
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            row.external_id,
            row.first_name,
            row.last_name,
            row.full_name,
            row.preferred_name,
            row.housing_status,
            row.age_group,
            row.gender,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(guest)
  }

  async fn search_guests(&self, text: &str, limit: usize) -> Result<Vec<Guest>> {
    let pattern   = format!("%{text}%");
    let limit_val = limit as i64;

    let raws: Vec<RawGuest> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, external_id, first_name, last_name, full_name,
                  preferred_name, housing_status, age_group, gender
           FROM guests
           WHERE full_name LIKE ?1
              OR preferred_name LIKE ?1
              OR external_id LIKE ?1
           ORDER BY full_name COLLATE NOCASE ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern, limit_val], |row| {
            Ok(RawGuest {
              id:             row.get(0)?,
              external_id:    row.get(1)?,
              first_name:     row.get(2)?,
              last_name:      row.get(3)?,
              full_name:      row.get(4)?,
              preferred_name: row.get(5)?,
              housing_status: row.get(6)?,
              age_group:      row.get(7)?,
              gender:         row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGuest::into_guest).collect()
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn record_meal(&self, input: NewMealAttendance) -> Result<RecordOutcome> {
    let attendance = MealAttendance {
      id:          Uuid::new_v4(),
      guest_id:    input.guest_id,
      meal_type:   input.meal_type,
      quantity:    input.quantity,
      served_on:   input.served_on,
      recorded_at: Utc::now(),
      notes:       input.notes,
    };

    let id_str       = encode_uuid(attendance.id);
    let guest_id_str = attendance.guest_id.map(encode_uuid);
    let type_str     = encode_category(attendance.meal_type).to_owned();
    let quantity     = attendance.quantity;
    let served_str   = encode_date(attendance.served_on);
    let recorded_str = encode_dt(attendance.recorded_at);
    let notes        = attendance.notes.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO meal_attendance (
             id, guest_id, meal_type, quantity, served_on, recorded_at, notes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            guest_id_str,
            type_str,
            quantity,
            served_str,
            recorded_str,
            notes,
          ],
        )?;
        Ok(())
      })
      .await;

    match inserted {
      Ok(()) => Ok(RecordOutcome::Recorded(attendance)),
      Err(err) if is_unique_violation(&err) => Ok(RecordOutcome::Duplicate),
      Err(err) => Err(err.into()),
    }
  }

  async fn attendance_on(&self, date: NaiveDate) -> Result<Vec<MealAttendance>> {
    let date_str = encode_date(date);
    let type_str = encode_category(MealCategory::Guest);

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, guest_id, meal_type, quantity, served_on, recorded_at,
                  notes
           FROM meal_attendance
           WHERE served_on = ?1 AND meal_type = ?2
           ORDER BY recorded_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![date_str, type_str], |row| {
            Ok(RawAttendance {
              id:          row.get(0)?,
              guest_id:    row.get(1)?,
              meal_type:   row.get(2)?,
              quantity:    row.get(3)?,
              served_on:   row.get(4)?,
              recorded_at: row.get(5)?,
              notes:       row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_attendance).collect()
  }

  async fn daily_total(&self, date: NaiveDate) -> Result<i64> {
    let date_str = encode_date(date);
    let type_str = encode_category(MealCategory::Guest);

    let total = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COALESCE(SUM(quantity), 0)
           FROM meal_attendance
           WHERE served_on = ?1 AND meal_type = ?2",
          rusqlite::params![date_str, type_str],
          |row| row.get(0),
        )?;
        Ok(total)
      })
      .await?;

    Ok(total)
  }
}
