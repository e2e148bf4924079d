//! Department and role picker drawn over the assignment screen.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use roster_core::roster::RoleOptions;

use crate::app::{App, Modal, ModalFocus};

use super::cursor_style;

/// A rectangle of `width`×`height` percent centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Percentage(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Percentage(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

fn list_block(title: &'static str, focused: bool) -> Block<'static> {
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border))
}

pub fn draw(f: &mut Frame, area: Rect, app: &App, modal: &Modal) {
  let popup = centered(area, 70, 70);
  f.render_widget(Clear, popup);

  let outer = Block::default()
    .title(format!(" {} ", modal.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::White));
  let inner = outer.inner(popup);
  f.render_widget(outer, popup);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(2)])
    .split(inner);
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(rows[0]);

  draw_departments(f, cols[0], app, modal);
  draw_roles(f, cols[1], app, modal);

  let footer = match &modal.error {
    Some(error) => Line::from(Span::styled(
      error.clone(),
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )),
    None => Line::from(Span::styled(
      format!("{} role(s) checked", modal.draft.roles().len()),
      Style::default().fg(Color::DarkGray),
    )),
  };
  f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), rows[1]);
}

// ─── Departments ──────────────────────────────────────────────────────────────

fn draw_departments(f: &mut Frame, area: Rect, app: &App, modal: &Modal) {
  let focused = modal.focus == ModalFocus::Departments;
  let block = list_block(" Department ", focused);
  let departments = &app.roster.departments;

  let items: Vec<ListItem> = departments
    .iter()
    .map(|d| {
      let marker = if modal.draft.department() == Some(d.department_id) { "(•) " } else { "( ) " };
      ListItem::new(Line::from(vec![Span::raw(marker), Span::raw(d.name.clone())]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((focused && !departments.is_empty()).then_some(modal.department_cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(cursor_style()),
    area,
    &mut state,
  );
}

// ─── Roles ────────────────────────────────────────────────────────────────────

fn draw_roles(f: &mut Frame, area: Rect, app: &App, modal: &Modal) {
  let focused = modal.focus == ModalFocus::Roles;
  let block = list_block(" Roles ", focused);

  let roles = match app.modal_role_options() {
    Some(RoleOptions::Available(roles)) => roles,
    other => {
      let hint = match other {
        Some(_) => "No roles for this department.",
        None => "Select a department first.",
      };
      let inner = block.inner(area);
      f.render_widget(block, area);
      f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        inner,
      );
      return;
    }
  };

  let items: Vec<ListItem> = roles
    .iter()
    .map(|r| {
      let check = if modal.draft.has_role(&r.name) { "[x] " } else { "[ ] " };
      let mut spans = vec![Span::raw(check), Span::raw(r.name.clone())];
      if !r.time_commitment.is_empty() {
        spans.push(Span::styled(
          format!("  {}", r.time_commitment),
          Style::default().fg(Color::DarkGray),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(focused.then_some(modal.role_cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(cursor_style()),
    area,
    &mut state,
  );
}
