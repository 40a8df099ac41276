//! Check-in application state machine and event dispatcher.
//!
//! Network requests run as spawned tasks that report back through an
//! unbounded channel; the event loop applies those messages between frames.
//! State transitions themselves are synchronous, which keeps them testable
//! without a terminal or a server.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use comedor_core::guest::Guest;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::client::{ApiClient, RecordOutcome};

/// Delay between the last keystroke and the search it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum trimmed query length before a search is issued.
pub const MIN_QUERY_LEN: usize = 2;

/// How often the running total is re-fetched from the server.
pub const TOTAL_REFRESH: Duration = Duration::from_secs(30);

/// The recent-entries pane keeps this many rows.
pub const HISTORY_LIMIT: usize = 10;

// ─── Messages ────────────────────────────────────────────────────────────────

/// Results delivered back to the event loop by spawned request tasks.
#[derive(Debug)]
pub enum AppMsg {
  /// A search resolved. `seq` identifies which issued search it answers.
  SearchDone {
    seq:    u64,
    result: anyhow::Result<Vec<Guest>>,
  },
  /// A meal submission resolved.
  SubmitDone {
    guest:    Guest,
    quantity: u32,
    result:   anyhow::Result<RecordOutcome>,
  },
  /// A totals refresh resolved.
  TotalDone { result: anyhow::Result<i64> },
}

/// One successfully recorded check-in, kept for the recent-entries pane.
#[derive(Debug, Clone)]
pub struct RecentEntry {
  pub guest:    Guest,
  pub quantity: u32,
  pub time:     DateTime<Local>,
}

// ─── Mode ────────────────────────────────────────────────────────────────────

/// What the keyboard currently drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Typing into the search box, moving through results.
  Search,
  /// A guest is selected; `1`/`2` submit, Esc cancels.
  Selected,
  /// A submission is in flight; submission keys are ignored.
  Submitting,
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub mode: Mode,

  /// Raw contents of the search input.
  pub query: String,

  /// Set on every edit; a search fires once this is `SEARCH_DEBOUNCE` old.
  last_edit: Option<Instant>,

  /// Sequence number of the most recently issued search. A result carrying
  /// an older sequence was superseded and is dropped.
  search_seq: u64,

  /// Whether a search is in flight for `search_seq`.
  pub searching: bool,

  pub results: Vec<Guest>,

  /// Cursor within `results`.
  pub cursor: usize,

  pub selected: Option<Guest>,

  /// Running total of guest meals served today. Bumped optimistically on a
  /// successful submission; the periodic refresh reconciles drift from
  /// other desks.
  pub total: i64,

  last_total_refresh: Option<Instant>,

  pub recent: Vec<RecentEntry>,

  /// One-line message shown in the status bar.
  pub status: String,

  client: Arc<ApiClient>,
  tx:     UnboundedSender<AppMsg>,
}

impl App {
  /// Create an [`App`] and the receiving end of its message channel.
  pub fn new(client: ApiClient) -> (Self, UnboundedReceiver<AppMsg>) {
    let (tx, rx) = unbounded_channel();
    let app = Self {
      mode: Mode::Search,
      query: String::new(),
      last_edit: None,
      search_seq: 0,
      searching: false,
      results: Vec::new(),
      cursor: 0,
      selected: None,
      total: 0,
      last_total_refresh: None,
      recent: Vec::new(),
      status: String::new(),
      client: Arc::new(client),
      tx,
    };
    (app, rx)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return false;
    }

    match self.mode {
      Mode::Search => self.handle_search_key(key),
      Mode::Selected => self.handle_selected_key(key),
      // A submission is pending; nothing to do until it resolves.
      Mode::Submitting => {}
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char(c) => {
        self.query.push(c);
        self.on_query_edited();
      }
      KeyCode::Backspace => {
        self.query.pop();
        self.on_query_edited();
      }
      KeyCode::Down => {
        if !self.results.is_empty() && self.cursor + 1 < self.results.len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Enter => {
        if let Some(guest) = self.results.get(self.cursor).cloned() {
          self.selected = Some(guest);
          self.mode = Mode::Selected;
          self.status.clear();
        }
      }
      KeyCode::Esc => {
        self.query.clear();
        self.clear_results();
        self.last_edit = None;
        self.status.clear();
      }
      _ => {}
    }
  }

  fn handle_selected_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('1') => self.submit(1),
      KeyCode::Char('2') => self.submit(2),
      KeyCode::Esc => {
        // Cancel: back to the search flow, selection discarded.
        self.selected = None;
        self.mode = Mode::Search;
        self.status.clear();
      }
      _ => {}
    }
  }

  fn on_query_edited(&mut self) {
    self.status.clear();
    if self.query.trim().chars().count() < MIN_QUERY_LEN {
      // Too short to search: drop shown and in-flight results immediately.
      self.clear_results();
      self.last_edit = None;
    } else {
      self.last_edit = Some(Instant::now());
    }
  }

  fn clear_results(&mut self) {
    self.results.clear();
    self.cursor = 0;
    if self.searching {
      // Invalidate the in-flight search so a late result cannot repopulate
      // the cleared list.
      self.search_seq += 1;
      self.searching = false;
    }
  }

  // ── Timers ────────────────────────────────────────────────────────────────

  /// Advance time-driven work: the search debounce and the total refresh.
  /// Called once per event-loop iteration.
  pub fn tick(&mut self, now: Instant) {
    if let Some(edited) = self.last_edit
      && now.duration_since(edited) >= SEARCH_DEBOUNCE
    {
      self.last_edit = None;
      self.issue_search();
    }

    let refresh_due = self
      .last_total_refresh
      .map_or(true, |t| now.duration_since(t) >= TOTAL_REFRESH);
    if refresh_due {
      self.last_total_refresh = Some(now);
      self.refresh_total();
    }
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  fn issue_search(&mut self) {
    let query = self.query.trim().to_owned();
    if query.chars().count() < MIN_QUERY_LEN {
      self.clear_results();
      return;
    }

    self.search_seq += 1;
    self.searching = true;
    let seq = self.search_seq;
    let client = Arc::clone(&self.client);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client.search_guests(&query).await;
      let _ = tx.send(AppMsg::SearchDone { seq, result });
    });
  }

  fn submit(&mut self, quantity: u32) {
    let Some(guest) = self.selected.clone() else {
      return;
    };
    self.mode = Mode::Submitting;
    self.status.clear();
    let client = Arc::clone(&self.client);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client.record_meal(guest.id, quantity).await;
      let _ = tx.send(AppMsg::SubmitDone { guest, quantity, result });
    });
  }

  fn refresh_total(&mut self) {
    let client = Arc::clone(&self.client);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = client.today_total().await;
      let _ = tx.send(AppMsg::TotalDone { result });
    });
  }

  // ── Message application ───────────────────────────────────────────────────

  /// Apply one resolved request result to the state.
  pub fn apply(&mut self, msg: AppMsg) {
    match msg {
      AppMsg::SearchDone { seq, result } => {
        if seq != self.search_seq {
          // Superseded by a newer search; drop the stale result.
          return;
        }
        self.searching = false;
        match result {
          Ok(guests) => {
            self.results = guests;
            self.cursor = 0;
          }
          Err(_) => {
            // Degrade quietly: typing continues, the status line carries
            // the hint.
            self.results.clear();
            self.cursor = 0;
            self.status = "Search unavailable — is the server running?".into();
          }
        }
      }
      AppMsg::SubmitDone { guest, quantity, result } => {
        self.finish_submit(guest, quantity, result);
      }
      AppMsg::TotalDone { result } => {
        if let Ok(total) = result {
          self.total = total;
        }
      }
    }
  }

  fn finish_submit(
    &mut self,
    guest: Guest,
    quantity: u32,
    result: anyhow::Result<RecordOutcome>,
  ) {
    match result {
      Ok(RecordOutcome::Recorded) => {
        self.recent.insert(
          0,
          RecentEntry { guest: guest.clone(), quantity, time: Local::now() },
        );
        self.recent.truncate(HISTORY_LIMIT);
        self.total += i64::from(quantity);
        self.selected = None;
        self.query.clear();
        self.clear_results();
        self.last_edit = None;
        self.mode = Mode::Search;
        let plural = if quantity == 1 { "" } else { "s" };
        self.status =
          format!("Recorded {quantity} meal{plural} for {}", guest.display_name());
      }
      Ok(RecordOutcome::AlreadyServed) => {
        // Keep the selection: the operator may cancel or retry another way.
        self.mode = Mode::Selected;
        self.status =
          format!("{} has already received a meal today", guest.full_name);
      }
      Err(_) => {
        self.mode = Mode::Selected;
        self.status = "Failed to record meal. Please try again.".into();
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use anyhow::anyhow;
  use uuid::Uuid;

  use super::*;
  use crate::client::ApiConfig;

  fn test_app() -> App {
    // Port 1 is never served; requests the tests accidentally spawn fail
    // fast and their results are dropped with the receiver.
    let client =
      ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:1".into() })
        .unwrap();
    let (app, _rx) = App::new(client);
    app
  }

  fn guest(full_name: &str) -> Guest {
    Guest {
      id:             Uuid::new_v4(),
      external_id:    "G-001".into(),
      first_name:     String::new(),
      last_name:      String::new(),
      full_name:      full_name.into(),
      preferred_name: None,
      housing_status: "unhoused".into(),
      age_group:      "adult".into(),
      gender:         "unknown".into(),
    }
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
  }

  fn recorded(app: &mut App, guest: Guest, quantity: u32) {
    app.apply(AppMsg::SubmitDone {
      guest,
      quantity,
      result: Ok(RecordOutcome::Recorded),
    });
  }

  // ── Search flow ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn short_query_never_issues_a_search() {
    let mut app = test_app();
    type_str(&mut app, "a");
    app.tick(Instant::now() + SEARCH_DEBOUNCE * 2);
    assert!(!app.searching);
    assert!(app.results.is_empty());
  }

  #[tokio::test]
  async fn search_fires_only_after_the_debounce() {
    let mut app = test_app();
    let start = Instant::now();
    type_str(&mut app, "ana");

    app.tick(start);
    assert!(!app.searching, "fired before the debounce elapsed");

    app.tick(start + SEARCH_DEBOUNCE * 2);
    assert!(app.searching);
  }

  #[tokio::test]
  async fn stale_search_results_are_discarded() {
    let mut app = test_app();
    type_str(&mut app, "an");
    app.tick(Instant::now() + SEARCH_DEBOUNCE * 2); // issues seq 1

    type_str(&mut app, "a"); // now "ana"
    app.tick(Instant::now() + SEARCH_DEBOUNCE * 2); // issues seq 2

    app.apply(AppMsg::SearchDone { seq: 1, result: Ok(vec![guest("Old Hit")]) });
    assert!(app.results.is_empty(), "stale result was applied");

    app.apply(AppMsg::SearchDone { seq: 2, result: Ok(vec![guest("New Hit")]) });
    assert_eq!(app.results.len(), 1);
    assert_eq!(app.results[0].full_name, "New Hit");
  }

  #[tokio::test]
  async fn clearing_below_minimum_invalidates_the_inflight_search() {
    let mut app = test_app();
    type_str(&mut app, "ana");
    app.tick(Instant::now() + SEARCH_DEBOUNCE * 2); // issues seq 1

    // Down to "a": the shown list clears and the in-flight search dies.
    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Backspace));
    assert!(!app.searching);

    app.apply(AppMsg::SearchDone { seq: 1, result: Ok(vec![guest("Late")]) });
    assert!(app.results.is_empty(), "late result repopulated a cleared list");
  }

  #[tokio::test]
  async fn search_failure_degrades_to_an_empty_list() {
    let mut app = test_app();
    type_str(&mut app, "ana");
    app.tick(Instant::now() + SEARCH_DEBOUNCE * 2);

    app.apply(AppMsg::SearchDone { seq: 1, result: Err(anyhow!("boom")) });
    assert!(app.results.is_empty());
    assert!(!app.status.is_empty());
    assert_eq!(app.mode, Mode::Search);
  }

  #[tokio::test]
  async fn cursor_moves_within_results_and_enter_selects() {
    let mut app = test_app();
    app.results = vec![guest("Ana"), guest("Bob"), guest("Carla")];

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down)); // clamped at the end
    assert_eq!(app.cursor, 2);

    app.handle_key(key(KeyCode::Up));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.mode, Mode::Selected);
    assert_eq!(app.selected.as_ref().unwrap().full_name, "Bob");
  }

  // ── Submission flow ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn success_resets_the_desk_and_bumps_the_total() {
    let mut app = test_app();
    let g = guest("Ana Ramirez");
    app.query = "ana".into();
    app.results = vec![g.clone()];
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('2')));
    assert_eq!(app.mode, Mode::Submitting);

    // Submission keys are ignored while in flight.
    app.handle_key(key(KeyCode::Char('1')));
    assert_eq!(app.mode, Mode::Submitting);

    recorded(&mut app, g.clone(), 2);
    assert_eq!(app.mode, Mode::Search);
    assert!(app.selected.is_none());
    assert!(app.query.is_empty());
    assert!(app.results.is_empty());
    assert_eq!(app.total, 2);
    assert_eq!(app.recent.len(), 1);
    assert_eq!(app.recent[0].guest.id, g.id);
    assert_eq!(app.recent[0].quantity, 2);
  }

  #[tokio::test]
  async fn conflict_keeps_the_selection() {
    let mut app = test_app();
    let g = guest("Ana Ramirez");
    app.results = vec![g.clone()];
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('1')));

    app.apply(AppMsg::SubmitDone {
      guest:    g.clone(),
      quantity: 1,
      result:   Ok(RecordOutcome::AlreadyServed),
    });
    assert_eq!(app.mode, Mode::Selected);
    assert_eq!(app.selected.as_ref().unwrap().id, g.id);
    assert_eq!(app.total, 0, "a rejected meal must not count");
    assert!(app.recent.is_empty());
    assert!(app.status.contains("already received a meal today"));
  }

  #[tokio::test]
  async fn other_failures_keep_the_selection_with_a_retry_message() {
    let mut app = test_app();
    let g = guest("Ana Ramirez");
    app.results = vec![g.clone()];
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('1')));

    app.apply(AppMsg::SubmitDone {
      guest:    g,
      quantity: 1,
      result:   Err(anyhow!("connection reset")),
    });
    assert_eq!(app.mode, Mode::Selected);
    assert!(app.selected.is_some());
    assert_eq!(app.status, "Failed to record meal. Please try again.");
  }

  #[tokio::test]
  async fn history_keeps_the_ten_most_recent_entries() {
    let mut app = test_app();
    for i in 0..12 {
      recorded(&mut app, guest(&format!("Guest {i}")), 1);
    }
    assert_eq!(app.recent.len(), HISTORY_LIMIT);
    assert_eq!(app.recent[0].guest.full_name, "Guest 11");
    assert_eq!(app.recent[9].guest.full_name, "Guest 2");
  }

  #[tokio::test]
  async fn periodic_refresh_reconciles_the_optimistic_total() {
    let mut app = test_app();
    recorded(&mut app, guest("Ana"), 2);
    assert_eq!(app.total, 2);

    // Another desk recorded meals too; the server knows better.
    app.apply(AppMsg::TotalDone { result: Ok(5) });
    assert_eq!(app.total, 5);

    // A failed refresh keeps the last known value.
    app.apply(AppMsg::TotalDone { result: Err(anyhow!("boom")) });
    assert_eq!(app.total, 5);
  }

  #[tokio::test]
  async fn escape_cancels_a_selection_without_side_effects() {
    let mut app = test_app();
    app.query = "ana".into();
    app.results = vec![guest("Ana")];
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.mode, Mode::Selected);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.mode, Mode::Search);
    assert!(app.selected.is_none());
    assert_eq!(app.total, 0);
    assert!(app.recent.is_empty());
    // The search context survives a cancel.
    assert_eq!(app.query, "ana");
    assert_eq!(app.results.len(), 1);
  }

  #[tokio::test]
  async fn ctrl_c_quits() {
    let mut app = test_app();
    let quit = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(!app.handle_key(quit));
  }
}
