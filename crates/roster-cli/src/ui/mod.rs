//! TUI rendering: header, screen body, modal overlay, status bar.

pub mod assignment;
pub mod event_list;
pub mod modal;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Pane, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Events => event_list::draw(f, rows[1], app),
    Screen::Assignment => assignment::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  if let Some(m) = &app.modal {
    modal::draw(f, area, app, m);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let title = match app.roster.selected_event_record() {
    Some(event) => format!(" roster  ·  {}", event.name),
    None => " roster".to_owned(),
  };
  let left = Span::styled(
    title,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    _ if app.modal.is_some() => (
      "ASSIGN",
      "Tab switch list  Space toggle  Enter pick/confirm  c confirm  Esc cancel",
    ),
    Screen::Assignment if app.filter_active => ("SEARCH", "Type to filter  Esc clear  Enter done"),
    Screen::Events => ("EVENTS", "↑↓/jk navigate  Enter open  r reload  q quit"),
    Screen::Assignment if app.pane == Pane::Unassigned => (
      "SELECT",
      "Space check  a assign  / search  Tab assigned  r reload  Esc events",
    ),
    Screen::Assignment => ("ASSIGNED", "Enter/e edit  s status  Tab unassigned  r reload  Esc events"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::Gray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// Style of the row under the cursor in a focused list.
pub(crate) fn cursor_style() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}
