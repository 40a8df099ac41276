//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use comedor_core::{
  attendance::{MealCategory, NewMealAttendance},
  guest::NewGuest,
  store::{CheckinStore, RecordOutcome, SEARCH_LIMIT},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_guest(full_name: &str, external_id: &str) -> NewGuest {
  let mut parts = full_name.splitn(2, ' ');
  NewGuest {
    external_id:    external_id.to_owned(),
    first_name:     parts.next().unwrap_or_default().to_owned(),
    last_name:      parts.next().unwrap_or_default().to_owned(),
    full_name:      full_name.to_owned(),
    preferred_name: None,
    housing_status: "unhoused".to_owned(),
    age_group:      "adult".to_owned(),
    gender:         "unknown".to_owned(),
  }
}

fn checkin(guest_id: Uuid, quantity: i64, served_on: NaiveDate) -> NewMealAttendance {
  NewMealAttendance::guest_checkin(guest_id, quantity, served_on).unwrap()
}

// ─── Guest directory ─────────────────────────────────────────────────────────

#[tokio::test]
async fn add_guest_assigns_an_id() {
  let s = store().await;
  let guest = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  assert_eq!(guest.full_name, "Ana Ramirez");
  assert_eq!(guest.external_id, "G-001");
}

#[tokio::test]
async fn search_matches_full_name_case_insensitively() {
  let s = store().await;
  s.add_guest(new_guest("ANA RAMIREZ", "G-001")).await.unwrap();
  s.add_guest(new_guest("Bob Jones", "G-002")).await.unwrap();

  let hits = s.search_guests("ana", SEARCH_LIMIT).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].full_name, "ANA RAMIREZ");
}

#[tokio::test]
async fn search_matches_preferred_name_and_external_id() {
  let s = store().await;
  let mut with_preferred = new_guest("Roberto Vega", "G-010");
  with_preferred.preferred_name = Some("Tito".to_owned());
  s.add_guest(with_preferred).await.unwrap();
  s.add_guest(new_guest("Carla Mendez", "TITAN-7")).await.unwrap();

  let hits = s.search_guests("tit", SEARCH_LIMIT).await.unwrap();
  let names: Vec<_> = hits.iter().map(|g| g.full_name.as_str()).collect();
  assert_eq!(names, vec!["Carla Mendez", "Roberto Vega"]);
}

#[tokio::test]
async fn search_orders_by_full_name_ascending() {
  let s = store().await;
  s.add_guest(new_guest("Maria Silva", "G-003")).await.unwrap();
  s.add_guest(new_guest("Ana Silva", "G-001")).await.unwrap();
  s.add_guest(new_guest("Jose Silva", "G-002")).await.unwrap();

  let hits = s.search_guests("silva", SEARCH_LIMIT).await.unwrap();
  let names: Vec<_> = hits.iter().map(|g| g.full_name.as_str()).collect();
  assert_eq!(names, vec!["Ana Silva", "Jose Silva", "Maria Silva"]);
}

#[tokio::test]
async fn search_caps_results_at_the_limit() {
  let s = store().await;
  for i in 0..15 {
    s.add_guest(new_guest(&format!("Guest Number{i:02}"), &format!("G-{i:03}")))
      .await
      .unwrap();
  }

  let hits = s.search_guests("guest", SEARCH_LIMIT).await.unwrap();
  assert_eq!(hits.len(), SEARCH_LIMIT);
}

#[tokio::test]
async fn search_without_match_is_empty() {
  let s = store().await;
  s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  assert!(s.search_guests("zzz", SEARCH_LIMIT).await.unwrap().is_empty());
}

// ─── Meal recording ──────────────────────────────────────────────────────────

#[tokio::test]
async fn record_meal_inserts_one_row() {
  let s = store().await;
  let guest = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  let today = day(2026, 8, 6);

  let outcome = s.record_meal(checkin(guest.id, 2, today)).await.unwrap();
  let row = match outcome {
    RecordOutcome::Recorded(row) => row,
    RecordOutcome::Duplicate => panic!("first insert reported duplicate"),
  };
  assert_eq!(row.guest_id, Some(guest.id));
  assert_eq!(row.meal_type, MealCategory::Guest);
  assert_eq!(row.quantity, 2);
  assert_eq!(row.served_on, today);

  let rows = s.attendance_on(today).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].id, row.id);
}

#[tokio::test]
async fn second_meal_same_guest_same_day_is_a_duplicate() {
  let s = store().await;
  let guest = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  let today = day(2026, 8, 6);

  s.record_meal(checkin(guest.id, 1, today)).await.unwrap();
  let second = s.record_meal(checkin(guest.id, 2, today)).await.unwrap();
  assert!(matches!(second, RecordOutcome::Duplicate));

  // The rejected insert must leave no trace.
  assert_eq!(s.attendance_on(today).await.unwrap().len(), 1);
  assert_eq!(s.daily_total(today).await.unwrap(), 1);
}

#[tokio::test]
async fn same_guest_on_another_day_is_not_a_duplicate() {
  let s = store().await;
  let guest = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();

  s.record_meal(checkin(guest.id, 1, day(2026, 8, 6))).await.unwrap();
  let next_day = s
    .record_meal(checkin(guest.id, 1, day(2026, 8, 7)))
    .await
    .unwrap();
  assert!(matches!(next_day, RecordOutcome::Recorded(_)));
}

#[tokio::test]
async fn other_categories_do_not_collide_with_guest_meals() {
  let s = store().await;
  let guest = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  let today = day(2026, 8, 6);

  s.record_meal(checkin(guest.id, 1, today)).await.unwrap();

  // A shelter row for the same guest and day is a different tally.
  let shelter = NewMealAttendance {
    guest_id:  Some(guest.id),
    meal_type: MealCategory::Shelter,
    quantity:  1,
    served_on: today,
    notes:     None,
  };
  assert!(matches!(
    s.record_meal(shelter).await.unwrap(),
    RecordOutcome::Recorded(_)
  ));
}

#[tokio::test]
async fn unattributed_rows_are_never_duplicates() {
  let s = store().await;
  let today = day(2026, 8, 6);

  for _ in 0..2 {
    let row = NewMealAttendance {
      guest_id:  None,
      meal_type: MealCategory::LunchBag,
      quantity:  1,
      served_on: today,
      notes:     None,
    };
    assert!(matches!(
      s.record_meal(row).await.unwrap(),
      RecordOutcome::Recorded(_)
    ));
  }
}

// ─── Daily totals ────────────────────────────────────────────────────────────

#[tokio::test]
async fn daily_total_is_zero_for_an_empty_day() {
  let s = store().await;
  assert_eq!(s.daily_total(day(2026, 8, 6)).await.unwrap(), 0);
}

#[tokio::test]
async fn daily_total_sums_guest_quantities() {
  let s = store().await;
  let a = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  let b = s.add_guest(new_guest("Bob Jones", "G-002")).await.unwrap();
  let today = day(2026, 8, 6);

  s.record_meal(checkin(a.id, 2, today)).await.unwrap();
  s.record_meal(checkin(b.id, 2, today)).await.unwrap();

  assert_eq!(s.daily_total(today).await.unwrap(), 4);
}

#[tokio::test]
async fn daily_total_ignores_other_days_and_categories() {
  let s = store().await;
  let guest = s.add_guest(new_guest("Ana Ramirez", "G-001")).await.unwrap();
  let today = day(2026, 8, 6);

  s.record_meal(checkin(guest.id, 1, today)).await.unwrap();
  s.record_meal(checkin(guest.id, 2, day(2026, 8, 5))).await.unwrap();
  s.record_meal(NewMealAttendance {
    guest_id:  None,
    meal_type: MealCategory::Extra,
    quantity:  5,
    served_on: today,
    notes:     None,
  })
  .await
  .unwrap();

  assert_eq!(s.daily_total(today).await.unwrap(), 1);
}
