//! MealAttendance — a single recorded meal-service event.
//!
//! Attendance rows are strictly append-only: created exactly once per
//! successful check-in, never updated or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Classification of an attendance record.
///
/// The check-in write path only ever produces [`MealCategory::Guest`] rows;
/// the other categories exist for tallies kept outside this flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealCategory {
  Guest,
  Extra,
  Rv,
  Shelter,
  UnitedEffort,
  DayWorker,
  LunchBag,
}

impl MealCategory {
  /// The string stored in the `meal_type` column.
  pub fn as_str(self) -> &'static str {
    match self {
      MealCategory::Guest => "guest",
      MealCategory::Extra => "extra",
      MealCategory::Rv => "rv",
      MealCategory::Shelter => "shelter",
      MealCategory::UnitedEffort => "united_effort",
      MealCategory::DayWorker => "day_worker",
      MealCategory::LunchBag => "lunch_bag",
    }
  }
}

impl std::str::FromStr for MealCategory {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "guest" => Ok(MealCategory::Guest),
      "extra" => Ok(MealCategory::Extra),
      "rv" => Ok(MealCategory::Rv),
      "shelter" => Ok(MealCategory::Shelter),
      "united_effort" => Ok(MealCategory::UnitedEffort),
      "day_worker" => Ok(MealCategory::DayWorker),
      "lunch_bag" => Ok(MealCategory::LunchBag),
      other => Err(Error::UnknownMealCategory(other.to_owned())),
    }
  }
}

/// A recorded meal-service event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealAttendance {
  pub id:          Uuid,
  /// `None` for categories not tied to an identified guest.
  pub guest_id:    Option<Uuid>,
  pub meal_type:   MealCategory,
  pub quantity:    u32,
  /// The service date the meal is attributed to (venue calendar day).
  pub served_on:   NaiveDate,
  /// Wall-clock insertion time, assigned by the store.
  pub recorded_at: DateTime<Utc>,
  pub notes:       Option<String>,
}

/// Input shape for recording an attendance row. `id` and `recorded_at` are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMealAttendance {
  pub guest_id:  Option<Uuid>,
  pub meal_type: MealCategory,
  pub quantity:  u32,
  pub served_on: NaiveDate,
  pub notes:     Option<String>,
}

impl NewMealAttendance {
  /// A guest-category check-in row. `quantity` must be 1 or 2.
  pub fn guest_checkin(
    guest_id: Uuid,
    quantity: i64,
    served_on: NaiveDate,
  ) -> Result<Self> {
    if quantity != 1 && quantity != 2 {
      return Err(Error::InvalidQuantity(quantity));
    }
    Ok(Self {
      guest_id:  Some(guest_id),
      meal_type: MealCategory::Guest,
      quantity:  quantity as u32,
      served_on,
      notes:     None,
    })
  }
}
