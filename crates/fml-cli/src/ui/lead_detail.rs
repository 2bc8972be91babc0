//! Lead detail: fields, status selector, and the note timeline.

use fml_core::score::ScoreBand;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::{
  app::App,
  ui::{band_color, status_color},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(detail) = app.detail.as_ref() else {
    f.render_widget(
      Paragraph::new("Loading…").style(Style::default().fg(Color::DarkGray)),
      area,
    );
    return;
  };
  let lead = &detail.lead;

  let block = Block::default()
    .title(format!(" {} ", lead.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  // Fields on top, notes below.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(9), Constraint::Min(0)])
    .split(inner);

  draw_fields(f, rows[0], app);
  draw_notes(f, rows[1], app);
}

// ─── Fields ───────────────────────────────────────────────────────────────────

fn field_line<'a>(label: &'a str, value: String) -> Line<'a> {
  Line::from(vec![
    Span::styled(
      format!("{label:<12}"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn draw_fields(f: &mut Frame, area: Rect, app: &App) {
  let Some(detail) = app.detail.as_ref() else { return };
  let lead = &detail.lead;

  let mut lines = vec![
    field_line("email", lead.email.clone()),
    field_line("phone", lead.phone.clone().unwrap_or_else(|| "-".into())),
    field_line("company", lead.company.clone().unwrap_or_else(|| "-".into())),
    field_line(
      "industry",
      lead.industry.clone().unwrap_or_else(|| "-".into()),
    ),
    field_line(
      "location",
      lead.location.clone().unwrap_or_else(|| "-".into()),
    ),
    field_line("source", lead.source.clone()),
  ];

  // Score with its band colour.
  let band = ScoreBand::from_score(lead.score);
  lines.push(Line::from(vec![
    Span::styled(
      format!("{:<12}", "score"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!("{:.0}", lead.score),
      Style::default()
        .fg(band_color(band.color()))
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!("  ({})", band.label().to_lowercase()),
      Style::default().fg(Color::DarkGray),
    ),
  ]));

  // Status selector: the displayed value carries the optimistic overlay;
  // mark it while the server call is in flight.
  if let Some(view) = app.status_view.as_ref() {
    let displayed = view.displayed();
    let mut spans = vec![
      Span::styled(
        format!("{:<12}", "status"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
      ),
      Span::styled(
        displayed.to_string(),
        Style::default()
          .fg(status_color(displayed.color()))
          .add_modifier(Modifier::BOLD),
      ),
    ];
    if view.in_flight() {
      spans.push(Span::styled(
        format!(" (saving, was {})", view.confirmed()),
        Style::default().fg(Color::Yellow),
      ));
    }
    spans.push(Span::styled(
      "  [ ] to change",
      Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::from(spans));
  }

  lines.push(field_line(
    "last contact",
    lead
      .last_contact
      .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
      .unwrap_or_else(|| "never".into()),
  ));

  f.render_widget(Paragraph::new(lines), area);
}

// ─── Notes ────────────────────────────────────────────────────────────────────

fn draw_notes(f: &mut Frame, area: Rect, app: &App) {
  let Some(detail) = app.detail.as_ref() else { return };

  let block = Block::default()
    .title(format!(" Notes ({}) ", detail.notes.len()))
    .borders(Borders::TOP)
    .border_style(Style::default().fg(Color::DarkGray));
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Note input box above the timeline when composing.
  if (app.note_active || !app.note_input.is_empty()) && inner.height > 1 {
    let input_area = Rect { height: 1, ..inner };
    inner.y += 1;
    inner.height -= 1;

    let cursor = if app.note_active { "_" } else { "" };
    f.render_widget(
      Paragraph::new(format!("> {}{cursor}", app.note_input))
        .style(Style::default().fg(Color::Yellow)),
      input_area,
    );
  }

  if detail.notes.is_empty() {
    f.render_widget(
      Paragraph::new("No notes yet. Press a to add one.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  // Newest-first timeline; two lines per note.
  let mut lines: Vec<Line> = Vec::new();
  for note in &detail.notes {
    lines.push(Line::from(vec![
      Span::styled(
        note.author.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
      ),
      Span::styled(
        format!("  {}", note.created_at.format("%Y-%m-%d %H:%M")),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
    lines.push(Line::from(Span::raw(format!("  {}", note.content))));
  }

  let scroll_offset = (app.detail_scroll * 2) as u16;
  f.render_widget(Paragraph::new(lines).scroll((scroll_offset, 0)), inner);
}
