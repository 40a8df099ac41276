//! `comedor` — terminal check-in client for the Comedor meal service.
//!
//! # Usage
//!
//! ```
//! comedor --url http://localhost:8430
//! comedor --config ~/.config/comedor/config.toml
//! ```

mod app;
mod client;
mod ui;

use std::{io, time::{Duration, Instant}};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
  },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "comedor", about = "Terminal check-in client for Comedor")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the comedor server (default: http://localhost:8430).
  #[arg(long, env = "COMEDOR_URL")]
  url: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
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
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8430".to_string()),
  };

  let client = ApiClient::new(api_config)?;
  let (mut app, mut rx) = App::new(client);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  rx: &mut UnboundedReceiver<app::AppMsg>,
) -> Result<()> {
  loop {
    // Fire debounced searches and the periodic total refresh. The first
    // tick also loads the initial total.
    app.tick(Instant::now());

    // Drain any resolved request results before drawing.
    while let Ok(msg) = rx.try_recv() {
      app.apply(msg);
    }

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
          if !app.handle_key(key) {
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
