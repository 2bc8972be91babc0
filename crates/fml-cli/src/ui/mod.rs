//! TUI rendering; orchestrates all screens.

pub mod dashboard;
pub mod insights;
pub mod lead_detail;
pub mod login;

use chrono::Local;
use fml_core::{
  score::BandColor,
  status::StatusColor,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

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

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.screen {
    Screen::Login => login::draw(f, area, app),
    Screen::Dashboard => dashboard::draw(f, area, app),
    Screen::LeadDetail => lead_detail::draw(f, area, app),
    Screen::Insights => insights::draw(f, area, app),
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " followmylead",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
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

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::Login => ("LOGIN", "Tab switch field  Enter submit  Esc quit"),
    Screen::Dashboard if app.filter_active => {
      ("SEARCH", "Type to filter  Esc cancel  Enter apply")
    }
    Screen::Dashboard => (
      "LEADS",
      "jk move  Enter open  1-8 sort  / filter  i insights  r reload  q quit",
    ),
    Screen::LeadDetail if app.note_active => {
      ("NOTE", "Type note  Enter submit  Esc keep draft")
    }
    Screen::LeadDetail => (
      "DETAIL",
      "[ ] change status  a add note  jk scroll  Esc back  q quit",
    ),
    Screen::Insights => ("INSIGHTS", "r refresh  Esc back  q quit"),
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
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Colour mapping ───────────────────────────────────────────────────────────

/// Terminal colour for a score band badge.
pub fn band_color(band: BandColor) -> Color {
  match band {
    BandColor::Green => Color::Green,
    BandColor::Yellow => Color::Yellow,
    BandColor::Red => Color::Red,
  }
}

/// Terminal colour for a status badge.
pub fn status_color(color: StatusColor) -> Color {
  match color {
    StatusColor::Blue => Color::Blue,
    StatusColor::Yellow => Color::Yellow,
    StatusColor::Green => Color::Green,
    StatusColor::Indigo => Color::LightBlue,
    StatusColor::Purple => Color::Magenta,
    StatusColor::Teal => Color::Cyan,
    StatusColor::Gray => Color::DarkGray,
  }
}
