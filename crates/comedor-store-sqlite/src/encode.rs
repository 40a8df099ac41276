//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, service dates as ISO calendar
//! dates (`YYYY-MM-DD`), UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use comedor_core::{
  attendance::{MealAttendance, MealCategory},
  guest::Guest,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── MealCategory ────────────────────────────────────────────────────────────

pub fn encode_category(c: MealCategory) -> &'static str { c.as_str() }

pub fn decode_category(s: &str) -> Result<MealCategory> {
  Ok(s.parse::<MealCategory>()?)
}

// ─── Raw row shapes ──────────────────────────────────────────────────────────

/// A `guests` row as read straight out of SQLite.
pub struct RawGuest {
  pub id:             String,
  pub external_id:    String,
  pub first_name:     String,
  pub last_name:      String,
  pub full_name:      String,
  pub preferred_name: Option<String>,
  pub housing_status: String,
  pub age_group:      String,
  pub gender:         String,
}

impl RawGuest {
  pub fn into_guest(self) -> Result<Guest> {
    Ok(Guest {
      id:             decode_uuid(&self.id)?,
      external_id:    self.external_id,
      first_name:     self.first_name,
      last_name:      self.last_name,
      full_name:      self.full_name,
      preferred_name: self.preferred_name,
      housing_status: self.housing_status,
      age_group:      self.age_group,
      gender:         self.gender,
    })
  }
}

/// A `meal_attendance` row as read straight out of SQLite.
pub struct RawAttendance {
  pub id:          String,
  pub guest_id:    Option<String>,
  pub meal_type:   String,
  pub quantity:    u32,
  pub served_on:   String,
  pub recorded_at: String,
  pub notes:       Option<String>,
}

impl RawAttendance {
  pub fn into_attendance(self) -> Result<MealAttendance> {
    Ok(MealAttendance {
      id:          decode_uuid(&self.id)?,
      guest_id:    self.guest_id.as_deref().map(decode_uuid).transpose()?,
      meal_type:   decode_category(&self.meal_type)?,
      quantity:    self.quantity,
      served_on:   decode_date(&self.served_on)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      notes:       self.notes,
    })
  }
}
