//! Insights screen: read-only render of the aggregate report.

use std::collections::BTreeMap;

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Insights ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(report) = app.insights.as_ref() else {
    f.render_widget(
      Paragraph::new("Loading…").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let mut lines: Vec<Line> = Vec::new();

  section(&mut lines, "Lead sources");
  for (source, count) in &report.lead_source_distribution {
    let rate = report
      .conversion_rates
      .get(source)
      .copied()
      .unwrap_or_default();
    lines.push(Line::from(vec![
      Span::raw(format!("  {source:<16} {count:>4}")),
      Span::styled(
        format!("   {:.0}% converted", rate * 100.0),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }

  section(&mut lines, "Lead quality");
  distribution(&mut lines, &report.quality_metrics.lead_quality_distribution);

  section(&mut lines, "Score profile");
  distribution(&mut lines, &report.quality_metrics.profile_score_distribution);

  section(&mut lines, "Engagement");
  let engagement = &report.engagement_metrics;
  lines.push(Line::from(Span::raw(format!(
    "  avg time on site   {:>6.0}s",
    engagement.average_time_spent
  ))));
  lines.push(Line::from(Span::raw(format!(
    "  avg page views     {:>6.1}",
    engagement.average_page_views
  ))));
  for (window, visits) in &engagement.total_visits {
    lines.push(Line::from(Span::raw(format!(
      "  visits, {window:<10} {visits:>6}"
    ))));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn section(lines: &mut Vec<Line<'_>>, title: &'static str) {
  if !lines.is_empty() {
    lines.push(Line::from(""));
  }
  lines.push(Line::from(Span::styled(
    title,
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
  )));
}

fn distribution(lines: &mut Vec<Line<'_>>, counts: &BTreeMap<String, u64>) {
  for (label, count) in counts {
    lines.push(Line::from(Span::raw(format!("  {label:<16} {count:>4}"))));
  }
}
