//! Dashboard: the sortable, filterable lead table.

use fml_core::{lead::Lead, score::ScoreBand};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
  app::App,
  sort::SORT_FIELDS,
  ui::{band_color, status_color},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible();
  let total = app.leads.len();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Leads ({}/{}) ", visible.len(), total)
  } else {
    format!(" Leads ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  // Filter bar at the bottom of the inner area.
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

  if visible.is_empty() {
    f.render_widget(
      Paragraph::new("No leads found. Upload some leads to get started.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let header = Row::new(
    SORT_FIELDS
      .iter()
      .enumerate()
      .map(|(i, field)| {
        let marker = if *field == app.sort.field {
          app.sort.direction.arrow()
        } else {
          ""
        };
        Cell::from(format!("{} {}{marker}", i + 1, field.label()))
      })
      .collect::<Vec<_>>(),
  )
  .style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let rows: Vec<Row> = visible.iter().map(lead_row).collect();

  let widths = [
    Constraint::Min(16),    // name
    Constraint::Min(20),    // email
    Constraint::Min(14),    // company
    Constraint::Length(13), // status
    Constraint::Length(12), // source
    Constraint::Length(8),  // score
    Constraint::Length(10), // value
    Constraint::Length(12), // created
  ];

  let mut state = TableState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    inner,
    &mut state,
  );
}

fn lead_row(lead: &Lead) -> Row<'static> {
  let band = ScoreBand::from_score(lead.score);

  Row::new(vec![
    Cell::from(lead.name.clone()),
    Cell::from(lead.email.clone()),
    Cell::from(lead.company.clone().unwrap_or_default()),
    Cell::from(Line::from(Span::styled(
      lead.status.to_string(),
      Style::default().fg(status_color(lead.status.color())),
    ))),
    Cell::from(lead.source.clone()),
    Cell::from(Line::from(Span::styled(
      format!("{:>5.0}", lead.score),
      Style::default().fg(band_color(band.color())),
    ))),
    Cell::from(
      lead
        .estimated_value
        .map(|v| format!("${v:.0}"))
        .unwrap_or_default(),
    ),
    Cell::from(lead.created_at.format("%Y-%m-%d").to_string()),
  ])
}
