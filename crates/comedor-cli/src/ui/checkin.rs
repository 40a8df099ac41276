//! Check-in pane: the selected guest, the meal-count actions, and the
//! recent-entries list.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, List, ListItem, Paragraph},
};

use crate::app::{App, Mode};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(7), Constraint::Min(0)])
    .split(area);

  draw_selection(f, rows[0], app);
  draw_recent(f, rows[1], app);
}

fn draw_selection(f: &mut Frame, area: Rect, app: &App) {
  let border = if app.mode == Mode::Search {
    Style::default().fg(Color::DarkGray)
  } else {
    Style::default().fg(Color::Green)
  };
  let block = Block::bordered().border_style(border).title("Check-in");

  let lines = match &app.selected {
    None => vec![Line::from(Span::styled(
      "Select a guest to record a meal.",
      Style::default().fg(Color::DarkGray),
    ))],
    Some(guest) => {
      let action = if app.mode == Mode::Submitting {
        Line::from(Span::styled(
          "Recording…",
          Style::default().fg(Color::Yellow),
        ))
      } else {
        Line::from("How many meals?  [1] one   [2] two   [Esc] cancel")
      };
      vec![
        Line::from(Span::styled(
          guest.display_name(),
          Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
          format!(
            "{} · {} · {} · {}",
            guest.external_id, guest.housing_status, guest.age_group,
            guest.gender
          ),
          Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
        action,
      ]
    }
  };

  f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_recent(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::bordered()
    .border_style(Style::default().fg(Color::DarkGray))
    .title("Recent entries");

  if app.recent.is_empty() {
    let msg = Paragraph::new("No meals recorded this session.")
      .style(Style::default().fg(Color::DarkGray))
      .block(block);
    f.render_widget(msg, area);
    return;
  }

  let items: Vec<ListItem> = app
    .recent
    .iter()
    .enumerate()
    .map(|(index, entry)| {
      let plural = if entry.quantity == 1 { "" } else { "s" };
      let style = if index == 0 {
        Style::default().fg(Color::Green)
      } else {
        Style::default()
      };
      ListItem::new(Line::from(Span::styled(
        format!(
          "{}  {} — {} meal{plural}",
          entry.time.format("%H:%M:%S"),
          entry.guest.display_name(),
          entry.quantity,
        ),
        style,
      )))
    })
    .collect();

  f.render_widget(List::new(items).block(block), area);
}
