//! Event picker: the first screen.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

use super::cursor_style;

/// Render the event list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let events = &app.roster.events;

  let block = Block::default()
    .title(format!(" Events ({}) ", events.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if events.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Span::styled(
        "No events yet.",
        Style::default().fg(Color::DarkGray),
      )),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = events
    .iter()
    .map(|event| {
      let date = event
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated   ".to_owned());
      let mode = event.mode.map(|m| m.to_string()).unwrap_or_default();

      let mut spans = vec![
        Span::styled(format!("{date}  "), Style::default().fg(Color::Cyan)),
        Span::raw(event.name.clone()),
      ];
      if !event.location.is_empty() {
        spans.push(Span::styled(
          format!("  @ {}", event.location),
          Style::default().fg(Color::DarkGray),
        ));
      }
      if !mode.is_empty() {
        spans.push(Span::styled(
          format!("  [{mode}]"),
          Style::default().fg(Color::DarkGray),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.event_cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(cursor_style()),
    area,
    &mut state,
  );
}
