//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fml_core::{
  insights::InsightsReport,
  lead::{Lead, LeadDetail},
  status::LeadStatus,
};
use strum::IntoEnumIterator as _;
use uuid::Uuid;

use crate::{
  client::{ApiClient, ClientError},
  mutation::Optimistic,
  sort::{SORT_FIELDS, SortState, visible_leads},
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Collect credentials; entered on startup and after any 401.
  Login,
  /// The sortable, filterable lead table.
  Dashboard,
  /// One lead with notes and the status selector.
  LeadDetail,
  /// Read-only aggregate report.
  Insights,
}

// ─── Login form ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct LoginForm {
  pub username:       String,
  pub password:       String,
  pub password_focus: bool,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// The full lead collection as last fetched. The dashboard view is
  /// recomputed from this on every change.
  pub leads: Vec<Lead>,

  pub sort:          SortState,
  pub filter:        String,
  pub filter_active: bool,

  /// Cursor position within the *visible* (filtered + sorted) list.
  pub list_cursor: usize,

  /// UUID of the currently-open lead, if any. Responses for any other lead
  /// are discarded on arrival.
  pub selected_lead_id: Option<Uuid>,

  /// Server state of the open lead.
  pub detail: Option<LeadDetail>,

  /// Displayed status of the open lead: server-confirmed plus an optional
  /// optimistic overlay.
  pub status_view: Option<Optimistic<LeadStatus>>,

  pub note_input:  String,
  pub note_active: bool,

  pub detail_scroll: usize,

  pub insights: Option<InsightsReport>,

  pub login: LoginForm,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] on the login screen with an empty collection.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::Login,
      leads: Vec::new(),
      sort: SortState::default(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      selected_lead_id: None,
      detail: None,
      status_view: None,
      note_input: String::new(),
      note_active: false,
      detail_scroll: 0,
      insights: None,
      login: LoginForm::default(),
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  /// The dashboard view: filtered and sorted, recomputed from scratch.
  pub fn visible(&self) -> Vec<Lead> {
    visible_leads(&self.leads, &self.filter, self.sort)
  }

  fn cursor_lead_id(&self) -> Option<Uuid> {
    self.visible().get(self.list_cursor).map(|l| l.lead_id)
  }

  /// The status the detail screen should show right now.
  pub fn displayed_status(&self) -> Option<LeadStatus> {
    self.status_view.as_ref().map(Optimistic::displayed)
  }

  // ── Error recovery ────────────────────────────────────────────────────────

  /// Route a failed call. An auth failure is the only global one: the
  /// session is dropped and the app returns to login. Everything else is a
  /// transient message on the current screen.
  fn handle_error(&mut self, err: ClientError) {
    match err {
      ClientError::Auth => {
        self.client.clear_token();
        self.login = LoginForm::default();
        self.screen = Screen::Login;
        self.status_msg = "Session expired, log in again".into();
      }
      other => {
        self.status_msg = format!("Error: {other}");
      }
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Attempt a login with the form's current credentials; on success the
  /// collection is loaded and the app lands on the dashboard.
  pub async fn try_login(&mut self) {
    self.status_msg = "Logging in…".into();
    let (user, pass) = (self.login.username.clone(), self.login.password.clone());
    let result = self.client.login(&user, &pass).await;
    match result {
      Ok(()) => {
        self.login.password.clear();
        self.status_msg = String::new();
        self.screen = Screen::Dashboard;
        self.load_leads().await;
      }
      Err(ClientError::Auth) => {
        self.login.password.clear();
        self.status_msg = "Invalid credentials".into();
      }
      Err(e) => self.handle_error(e),
    }
  }

  /// Fetch the full collection and reset the cursor.
  pub async fn load_leads(&mut self) {
    self.status_msg = "Loading leads…".into();
    let result = self.client.list_leads().await;
    match result {
      Ok(leads) => {
        self.leads = leads;
        self.list_cursor = 0;
        self.status_msg = String::new();
      }
      Err(e) => self.handle_error(e),
    }
  }

  /// Transition to `LeadDetail` for `id`, loading the lead and its notes.
  async fn open_detail(&mut self, id: Uuid) {
    self.status_msg = "Loading…".into();
    let result = self.client.get_detail(id).await;
    match result {
      Ok(detail) => {
        self.status_view = Some(Optimistic::new(detail.lead.status));
        self.selected_lead_id = Some(id);
        self.detail = Some(detail);
        self.detail_scroll = 0;
        self.note_input.clear();
        self.note_active = false;
        self.screen = Screen::LeadDetail;
        self.status_msg = String::new();
      }
      Err(e) => self.handle_error(e),
    }
  }

  fn close_detail(&mut self) {
    self.screen = Screen::Dashboard;
    self.selected_lead_id = None;
    self.detail = None;
    self.status_view = None;
    self.note_input.clear();
    self.note_active = false;
  }

  async fn load_insights(&mut self) {
    self.status_msg = "Loading insights…".into();
    let result = self.client.insights().await;
    match result {
      Ok(report) => {
        self.insights = Some(report);
        self.screen = Screen::Insights;
        self.status_msg = String::new();
      }
      Err(e) => self.handle_error(e),
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Optimistic status transition: flip the display first, then confirm
  /// with the server; revert to the confirmed value on failure.
  async fn change_status(&mut self, next: LeadStatus) {
    let Some(id) = self.selected_lead_id else { return };
    {
      let Some(view) = self.status_view.as_mut() else { return };
      // One mutation in flight per screen.
      if view.in_flight() || view.displayed() == next {
        return;
      }
      view.begin(next);
    }

    let result = self.client.set_status(id, next).await;
    match result {
      Ok(lead) => {
        // Keep the dashboard collection in sync regardless of navigation.
        if let Some(held) =
          self.leads.iter_mut().find(|l| l.lead_id == lead.lead_id)
        {
          *held = lead.clone();
        }
        // Apply to the detail screen only if this lead is still open.
        if self.selected_lead_id == Some(lead.lead_id) {
          if let Some(view) = self.status_view.as_mut() {
            view.commit(lead.status);
          }
          if let Some(detail) = self.detail.as_mut() {
            detail.lead = lead;
          }
          self.status_msg = "Status updated".into();
        }
      }
      Err(e) => {
        if let Some(view) = self.status_view.as_mut() {
          view.rollback();
        }
        self.handle_error(e);
      }
    }
  }

  /// Note submission is not optimistic: the list only changes once the
  /// server has assigned the note its identity and timestamp. On failure
  /// the input is preserved.
  async fn submit_note(&mut self) {
    let Some(id) = self.selected_lead_id else { return };
    let content = self.note_input.trim().to_owned();
    if content.is_empty() {
      self.status_msg = "Note content must not be empty".into();
      return;
    }

    let result = self.client.add_note(id, &content).await;
    match result {
      Ok(note) => {
        // Discard if the user navigated away while the request ran.
        if self.selected_lead_id == Some(note.lead_id) {
          if let Some(detail) = self.detail.as_mut() {
            detail.notes.insert(0, note);
          }
          self.note_input.clear();
          self.note_active = false;
          self.status_msg = "Note added".into();
        }
      }
      Err(e) => self.handle_error(e),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return Ok(false);
    }

    match self.screen {
      Screen::Login => self.handle_login_key(key).await,
      Screen::Dashboard if self.filter_active => self.handle_filter_key(key),
      Screen::Dashboard => self.handle_dashboard_key(key).await,
      Screen::LeadDetail if self.note_active => self.handle_note_key(key).await,
      Screen::LeadDetail => self.handle_detail_key(key).await,
      Screen::Insights => self.handle_insights_key(key).await,
    }
  }

  async fn handle_login_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
        self.login.password_focus = !self.login.password_focus;
      }
      KeyCode::Enter => self.try_login().await,
      KeyCode::Backspace => {
        if self.login.password_focus {
          self.login.password.pop();
        } else {
          self.login.username.pop();
        }
      }
      KeyCode::Char(c) => {
        if self.login.password_focus {
          self.login.password.push(c);
        } else {
          self.login.username.push(c);
        }
      }
      _ => {}
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_dashboard_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_lead_id() {
          self.open_detail(id).await;
        }
      }

      // Sort: 1-8 select a column; the same key again flips direction.
      KeyCode::Char(c @ '1'..='8') => {
        let idx = (c as usize) - ('1' as usize);
        if let Some(field) = SORT_FIELDS.get(idx) {
          self.sort.select(*field);
          self.list_cursor = 0;
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      // Reload / insights
      KeyCode::Char('r') => self.load_leads().await,
      KeyCode::Char('i') => self.load_insights().await,

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to dashboard
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.close_detail(),

      // Scroll notes
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.detail.as_ref().map_or(0, |d| d.notes.len());
        if self.detail_scroll + 1 < len {
          self.detail_scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.detail_scroll > 0 {
          self.detail_scroll -= 1;
        }
      }

      // Status selector: walk the closed vocabulary.
      KeyCode::Char(']') => {
        if let Some(current) = self.displayed_status() {
          self.change_status(adjacent_status(current, true)).await;
        }
      }
      KeyCode::Char('[') => {
        if let Some(current) = self.displayed_status() {
          self.change_status(adjacent_status(current, false)).await;
        }
      }

      // Note input
      KeyCode::Char('a') => {
        self.note_active = true;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_note_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        // Leave input mode; the draft is kept.
        self.note_active = false;
      }
      KeyCode::Enter => self.submit_note().await,
      KeyCode::Backspace => {
        self.note_input.pop();
      }
      KeyCode::Char(c) => self.note_input.push(c),
      _ => {}
    }
    Ok(true)
  }

  async fn handle_insights_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::Dashboard;
      }
      KeyCode::Char('r') => self.load_insights().await,
      _ => {}
    }
    Ok(true)
  }
}

/// The neighbour of `current` in pipeline order, wrapping at both ends.
fn adjacent_status(current: LeadStatus, forward: bool) -> LeadStatus {
  let all: Vec<LeadStatus> = LeadStatus::iter().collect();
  let idx = all.iter().position(|s| *s == current).unwrap_or(0);
  let next = if forward {
    (idx + 1) % all.len()
  } else {
    (idx + all.len() - 1) % all.len()
  };
  all[next]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_selector_wraps_both_ways() {
    assert_eq!(adjacent_status(LeadStatus::New, true), LeadStatus::Contacted);
    assert_eq!(adjacent_status(LeadStatus::Lost, true), LeadStatus::New);
    assert_eq!(adjacent_status(LeadStatus::New, false), LeadStatus::Lost);
    assert_eq!(
      adjacent_status(LeadStatus::Qualified, false),
      LeadStatus::Contacted
    );
  }
}
