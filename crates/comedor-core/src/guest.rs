//! Guest — a directory record for a person eligible for meal service.
//!
//! Guest records are created and maintained by an external registration
//! process. The check-in flow only ever reads them; the server's import
//! mode is the single write path into the directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person tracked in the guest directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
  /// Stable, unique identifier. Never reassigned.
  pub id:             Uuid,
  /// Human-facing code, unique across the directory.
  pub external_id:    String,
  pub first_name:     String,
  pub last_name:      String,
  /// Display string and the sort key for search results.
  pub full_name:      String,
  /// Preferred over `full_name` for display when the two differ.
  pub preferred_name: Option<String>,
  pub housing_status: String,
  pub age_group:      String,
  pub gender:         String,
}

impl Guest {
  /// The name shown at the check-in desk: the preferred name with the full
  /// name in parentheses when the two differ.
  pub fn display_name(&self) -> String {
    match &self.preferred_name {
      Some(preferred) if preferred != &self.full_name => {
        format!("{preferred} ({})", self.full_name)
      }
      _ => self.full_name.clone(),
    }
  }
}

/// Input shape for inserting a guest. The `id` is assigned by the store.
///
/// Used by the registration import and by tests; the check-in flow never
/// creates guests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
  pub external_id:    String,
  pub first_name:     String,
  pub last_name:      String,
  pub full_name:      String,
  #[serde(default)]
  pub preferred_name: Option<String>,
  pub housing_status: String,
  pub age_group:      String,
  pub gender:         String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn guest(full: &str, preferred: Option<&str>) -> Guest {
    Guest {
      id:             Uuid::new_v4(),
      external_id:    "G-001".into(),
      first_name:     "Ana".into(),
      last_name:      "Ramirez".into(),
      full_name:      full.into(),
      preferred_name: preferred.map(str::to_owned),
      housing_status: "unhoused".into(),
      age_group:      "adult".into(),
      gender:         "female".into(),
    }
  }

  #[test]
  fn display_name_without_preferred_is_full_name() {
    assert_eq!(guest("Ana Ramirez", None).display_name(), "Ana Ramirez");
  }

  #[test]
  fn display_name_with_distinct_preferred_shows_both() {
    assert_eq!(
      guest("Ana Ramirez", Some("Annie")).display_name(),
      "Annie (Ana Ramirez)"
    );
  }

  #[test]
  fn display_name_with_matching_preferred_is_not_doubled() {
    assert_eq!(
      guest("Ana Ramirez", Some("Ana Ramirez")).display_name(),
      "Ana Ramirez"
    );
  }
}
