//! The service-date resolver.
//!
//! Meal counting is a physical-venue, single-time-zone operation: a record
//! belongs to the calendar day at the venue, not to the UTC day or to
//! whatever zone the server process happens to run in. Every time-scoped
//! read and write goes through [`today`] so the notion of "day" stays
//! consistent across deployments.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::Los_Angeles;

/// The civil time zone the venue operates in.
pub const VENUE_TZ: chrono_tz::Tz = Los_Angeles;

/// The service date a given instant falls on.
pub fn service_date_of(instant: DateTime<Utc>) -> NaiveDate {
  instant.with_timezone(&VENUE_TZ).date_naive()
}

/// Today's service date.
pub fn today() -> NaiveDate {
  service_date_of(Utc::now())
}
