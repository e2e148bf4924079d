//! Assignment screen: unassigned volunteers on the left, assigned on the right.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Pane};

use super::cursor_style;

/// Render both panes into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_unassigned(f, cols[0], app);
  draw_assigned(f, cols[1], app);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border))
}

// ─── Unassigned ───────────────────────────────────────────────────────────────

fn draw_unassigned(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_unassigned();
  let total = app.partition.as_ref().map_or(0, |p| p.unassigned.len());
  let focused = app.pane == Pane::Unassigned;

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Unassigned ({}/{total}) · {} checked ", filtered.len(), app.selection.len())
  } else {
    format!(" Unassigned ({total}) · {} checked ", app.selection.len())
  };
  let block = pane_block(title, focused);

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|v| {
      let check = if app.selection.contains(v.volunteer_id) { "[x] " } else { "[ ] " };
      let mut spans = vec![Span::raw(check), Span::raw(v.name.clone())];
      if !v.kendra.is_empty() {
        spans.push(Span::styled(
          format!("  {}", v.kendra),
          Style::default().fg(Color::DarkGray),
        ));
      }
      if !v.skills.is_empty() {
        spans.push(Span::styled(
          format!("  {}", v.skills),
          Style::default().fg(Color::Green),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height = inner.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select((focused && !filtered.is_empty()).then_some(app.unassigned_cursor));

  f.render_stateful_widget(List::new(items).highlight_style(cursor_style()), inner, &mut state);
}

// ─── Assigned ─────────────────────────────────────────────────────────────────

fn draw_assigned(f: &mut Frame, area: Rect, app: &App) {
  let assigned = app.assigned();
  let focused = app.pane == Pane::Assigned;
  let orphaned = app.partition.as_ref().map_or(0, |p| p.orphaned.len());

  let title = if orphaned > 0 {
    format!(" Assigned ({}) · {orphaned} unknown ", assigned.len())
  } else {
    format!(" Assigned ({}) ", assigned.len())
  };
  let block = pane_block(title, focused);

  let items: Vec<ListItem> = assigned
    .iter()
    .map(|a| {
      let roles = if a.assigned_roles.is_empty() {
        "no roles".to_owned()
      } else {
        a.assigned_roles.join(", ")
      };
      ListItem::new(Line::from(vec![
        Span::raw(a.volunteer.name.clone()),
        Span::styled(
          format!("  {}", a.department_name),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("  {roles}"), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("  {}", a.status), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((focused && !assigned.is_empty()).then_some(app.assigned_cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(cursor_style()),
    area,
    &mut state,
  );
}
