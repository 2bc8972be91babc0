//! `fml`: terminal UI for the FollowMyLead lead store.
//!
//! # Usage
//!
//! ```
//! fml --url http://localhost:5002 --user sales --password secret
//! fml --config ~/.config/fml/config.toml
//! fml --upload leads.csv --user sales --password secret
//! ```

mod app;
mod client;
mod mutation;
mod sort;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result, bail};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fml", about = "Terminal UI for the FollowMyLead lead store")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the API server (default: http://localhost:5002).
  #[arg(long, env = "FML_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "FML_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "FML_PASSWORD")]
  password: Option<String>,

  /// Upload a CSV of leads and exit instead of starting the UI.
  #[arg(long, value_name = "FILE")]
  upload: Option<std::path::PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:5002".to_string());
  let username = args
    .user
    .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
    .unwrap_or_default();
  let password = args
    .password
    .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
    .unwrap_or_default();

  let client = ApiClient::new(ApiConfig { base_url })
    .map_err(|e| anyhow::anyhow!("building HTTP client: {e}"))?;

  // One-shot upload mode: no UI, just ingest and report.
  if let Some(path) = &args.upload {
    if username.is_empty() || password.is_empty() {
      bail!("--upload requires --user and --password (or a config file)");
    }
    client
      .login(&username, &password)
      .await
      .map_err(|e| anyhow::anyhow!("login failed: {e}"))?;

    let bytes = std::fs::read(path)
      .with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "leads.csv".to_string());

    let imported = client
      .upload_csv(&file_name, bytes)
      .await
      .map_err(|e| anyhow::anyhow!("upload failed: {e}"))?;
    println!("imported {imported} leads");
    return Ok(());
  }

  let mut app = App::new(client);

  // Pre-fill the login form; attempt the login up front when both are set.
  app.login.username = username;
  app.login.password = password;
  if !app.login.username.is_empty() && !app.login.password.is_empty() {
    app.try_login().await;
  }

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
