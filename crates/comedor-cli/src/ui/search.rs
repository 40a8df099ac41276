//! Search pane: query input plus the result list.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Position, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, MIN_QUERY_LEN, Mode};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  draw_input(f, rows[0], app);
  draw_results(f, rows[1], app);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
  let border = if app.mode == Mode::Search {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  };

  let input = Paragraph::new(app.query.as_str()).block(
    Block::bordered()
      .border_style(border)
      .title("Search guest by name or ID"),
  );
  f.render_widget(input, area);

  // Show the terminal cursor at the end of the query while typing.
  if app.mode == Mode::Search {
    let x = area.x + 1 + app.query.chars().count() as u16;
    let max_x = area.right().saturating_sub(2);
    f.set_cursor_position(Position::new(x.min(max_x), area.y + 1));
  }
}

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::bordered()
    .border_style(Style::default().fg(Color::DarkGray))
    .title("Results");

  if app.searching {
    let msg = Paragraph::new("Searching…")
      .style(Style::default().fg(Color::DarkGray))
      .block(block);
    f.render_widget(msg, area);
    return;
  }

  let query = app.query.trim();
  if app.results.is_empty() {
    let text = if query.chars().count() >= MIN_QUERY_LEN {
      format!("No guests found matching \"{query}\"")
    } else {
      String::new()
    };
    let msg = Paragraph::new(text)
      .style(Style::default().fg(Color::DarkGray))
      .block(block);
    f.render_widget(msg, area);
    return;
  }

  let items: Vec<ListItem> = app
    .results
    .iter()
    .map(|guest| {
      ListItem::new(vec![
        Line::from(Span::styled(
          guest.display_name(),
          Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
          format!(
            "  {} · {} · {}",
            guest.external_id, guest.housing_status, guest.age_group
          ),
          Style::default().fg(Color::DarkGray),
        )),
      ])
    })
    .collect();

  let list = List::new(items).block(block).highlight_style(
    Style::default()
      .bg(Color::Rgb(18, 60, 40))
      .add_modifier(Modifier::BOLD),
  );

  let mut state = ListState::default();
  state.select(Some(app.cursor));
  f.render_stateful_widget(list, area, &mut state);
}
