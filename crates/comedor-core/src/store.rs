//! The `CheckinStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `comedor-store-sqlite`). Higher layers (`comedor-api`, the server binary)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  attendance::{MealAttendance, NewMealAttendance},
  guest::{Guest, NewGuest},
};

/// Maximum number of guests a directory search returns.
pub const SEARCH_LIMIT: usize = 10;

/// Result of a [`CheckinStore::record_meal`] insert.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
  /// The row was inserted.
  Recorded(MealAttendance),
  /// A guest-category row already exists for this guest and service date;
  /// nothing was inserted.
  Duplicate,
}

/// Abstraction over the guest directory and the attendance store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CheckinStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Guest directory ───────────────────────────────────────────────────

  /// Insert a guest record and return it with its assigned id.
  ///
  /// Guests arrive via the registration import; the check-in flow never
  /// calls this.
  fn add_guest(
    &self,
    input: NewGuest,
  ) -> impl Future<Output = Result<Guest, Self::Error>> + Send + '_;

  /// Case-insensitive partial match of `text` against full name, preferred
  /// name or external id, ordered ascending by full name, capped at
  /// `limit` rows.
  fn search_guests<'a>(
    &'a self,
    text: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Guest>, Self::Error>> + Send + 'a;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Insert one attendance row.
  ///
  /// For guest-category rows the store enforces at most one record per
  /// (guest, service date) pair; a second insert for the same pair yields
  /// [`RecordOutcome::Duplicate`] and persists nothing.
  fn record_meal(
    &self,
    input: NewMealAttendance,
  ) -> impl Future<Output = Result<RecordOutcome, Self::Error>> + Send + '_;

  /// All guest-category attendance rows served on `date`.
  fn attendance_on(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<MealAttendance>, Self::Error>> + Send + '_;

  /// Sum of guest-category quantities served on `date`; 0 for an empty day.
  fn daily_total(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;
}
