//! Login screen: username/password form, centered.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let form_area = centered(area, 46, 8);

  let block = Block::default()
    .title(" Sign in ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(form_area);
  f.render_widget(block, form_area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Length(1),
    ])
    .split(inner);

  let field = |label: &str, value: &str, focused: bool, masked: bool| {
    let shown = if masked {
      "*".repeat(value.chars().count())
    } else {
      value.to_owned()
    };
    let cursor = if focused { "_" } else { "" };
    let style = if focused {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    Line::from(vec![
      Span::styled(format!("{label:>10}: "), Style::default().fg(Color::Cyan)),
      Span::styled(format!("{shown}{cursor}"), style),
    ])
  };

  f.render_widget(
    Paragraph::new(field(
      "username",
      &app.login.username,
      !app.login.password_focus,
      false,
    )),
    rows[0],
  );
  f.render_widget(
    Paragraph::new(field(
      "password",
      &app.login.password,
      app.login.password_focus,
      true,
    )),
    rows[1],
  );
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      "Enter to sign in",
      Style::default().fg(Color::DarkGray),
    ))),
    rows[3],
  );
}

/// A `width` x `height` rect centered inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let w = width.min(area.width);
  let h = height.min(area.height);
  Rect {
    x:      area.x + (area.width - w) / 2,
    y:      area.y + (area.height - h) / 2,
    width:  w,
    height: h,
  }
}
