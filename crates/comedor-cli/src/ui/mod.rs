//! TUI rendering — orchestrates all panes.

pub mod checkin;
pub mod search;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " comedor — meal check-in",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date}  ·  today: {} meals ", app.total),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  // Search pane on the left, check-in pane on the right.
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(area);

  search::draw(f, cols[0], app);
  checkin::draw(f, cols[1], app);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let text = if !app.status.is_empty() {
    app.status.clone()
  } else {
    match app.mode {
      Mode::Search => {
        " Type a name to search · ↑/↓ move · Enter select · Ctrl-C quit".into()
      }
      Mode::Selected => " [1] one meal · [2] two meals · Esc cancel".into(),
      Mode::Submitting => " Recording…".into(),
    }
  };

  let style = if app.status.is_empty() {
    Style::default().fg(Color::DarkGray)
  } else {
    Style::default().fg(Color::Yellow)
  };
  f.render_widget(Paragraph::new(text).style(style), area);
}
