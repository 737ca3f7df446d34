/// Main TUI application
///
/// Owns the dashboard state and dispatches one key at a time. Engine calls are
/// awaited inline, so no further input is read until the current action has
/// finished and the state has been swapped in.

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::io;
use tracing::{debug, info, warn};

use crate::core::docker::ContainerDetails;
use crate::core::{DashboardState, Engine, EngineError};
use crate::screens::dashboard::{self, DashboardView, DetailPane, Palette};
use crate::utils::AppConfig;

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

const READY_STATUS: &str = "Ready";

/// Work a key asks the controller to perform against the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Refresh,
    /// Carries the identifier captured when the key was pressed
    Start(String),
    Stop(String),
}

/// Result of dispatching a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Quit,
    /// Handled without touching the engine
    Consumed,
    Run(Action),
    /// Not an action key; left for list navigation
    Ignored(KeyEvent),
}

pub struct App<E: Engine> {
    engine: E,
    state: DashboardState,
    detail: DetailPane,
    status: String,
    palette: Palette,
    should_quit: bool,
}

impl<E: Engine> App<E> {
    pub fn new(engine: E, config: &AppConfig) -> Self {
        Self {
            engine,
            state: DashboardState::default(),
            detail: DetailPane::Prompt,
            status: READY_STATUS.to_string(),
            palette: Palette::from_config(&config.ui),
            should_quit: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn detail(&self) -> &DetailPane {
        &self.detail
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("dashboard started");

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "initial container listing failed");
        }

        let mut events = EventStream::new();

        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            let Some(event) = events.next().await else {
                break;
            };

            match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match self.handle_key(key) {
                        KeyOutcome::Run(action) => {
                            // Show the in-progress message before blocking on the engine
                            terminal.draw(|f| self.render(f))?;
                            self.perform(action).await;
                        }
                        KeyOutcome::Ignored(key) => self.navigate(key).await,
                        KeyOutcome::Quit | KeyOutcome::Consumed => {}
                    }
                }
                // Resize and everything else: the next iteration redraws
                _ => {}
            }
        }

        info!("dashboard stopped");
        Ok(())
    }

    /// Map a key to its outcome. Action keys capture the selected identifier
    /// and set the in-progress status here; the engine is not touched.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return KeyOutcome::Quit;
        }

        // Ctrl/Alt chords never trigger actions
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return KeyOutcome::Ignored(key);
        }

        let code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                KeyOutcome::Quit
            }
            KeyCode::Char('r') => {
                self.set_status("Refreshing containers...");
                KeyOutcome::Run(Action::Refresh)
            }
            KeyCode::Char('s') => match self.state.selected_target() {
                Some(id) => {
                    let id = id.to_string();
                    self.set_status("Starting container...");
                    KeyOutcome::Run(Action::Start(id))
                }
                None => {
                    self.set_status("No container selected.");
                    KeyOutcome::Consumed
                }
            },
            KeyCode::Char('t') => match self.state.selected_target() {
                Some(id) => {
                    let id = id.to_string();
                    self.set_status("Stopping container...");
                    KeyOutcome::Run(Action::Stop(id))
                }
                None => {
                    self.set_status("No container selected.");
                    KeyOutcome::Consumed
                }
            },
            _ => KeyOutcome::Ignored(key),
        }
    }

    /// Run an action to completion and record its outcome in the status line
    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::Refresh => match self.refresh().await {
                Ok(()) => self.set_status("Container list refreshed."),
                Err(e) => self.set_status(format!("Refresh failed: {}", e)),
            },
            Action::Start(id) => match self.engine.start_container(&id).await {
                Ok(()) => {
                    info!(container = %id, "container started");
                    self.set_status("Container started.");
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "refresh after start failed");
                    }
                }
                Err(e) => {
                    warn!(container = %id, error = %e, "start failed");
                    self.set_status(format!("Start failed: {}", e));
                }
            },
            Action::Stop(id) => match self.engine.stop_container(&id).await {
                Ok(()) => {
                    info!(container = %id, "container stopped");
                    self.set_status("Container stopped.");
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "refresh after stop failed");
                    }
                }
                Err(e) => {
                    warn!(container = %id, error = %e, "stop failed");
                    self.set_status(format!("Stop failed: {}", e));
                }
            },
        }
    }

    /// Move the selection; a changed selection reloads the detail pane
    pub async fn navigate(&mut self, key: KeyEvent) {
        let changed = match key.code {
            KeyCode::Down => self.state.select_next(),
            KeyCode::Up => self.state.select_previous(),
            KeyCode::Home => self.state.select_first(),
            KeyCode::End => self.state.select_last(),
            KeyCode::PageDown => self.state.page_down(PAGE_SIZE),
            KeyCode::PageUp => self.state.page_up(PAGE_SIZE),
            _ => false,
        };

        if changed {
            self.load_selected_detail().await;
        }
    }

    /// Replace the snapshot with a fresh listing. A failed listing still
    /// replaces it (with an error row) and is returned to the caller.
    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        let listing = self.engine.list_containers().await;
        let outcome = match &listing {
            Ok(containers) => {
                debug!(count = containers.len(), "container list refreshed");
                Ok(())
            }
            Err(e) => Err(e.clone()),
        };

        self.state = DashboardState::from_listing(listing);
        self.load_selected_detail().await;

        outcome
    }

    /// Inspect the selected container, then take one resource sample
    async fn load_selected_detail(&mut self) {
        let Some(id) = self.state.selected_target().map(str::to_string) else {
            self.detail = DetailPane::Prompt;
            return;
        };

        let info = match self.engine.inspect_container(&id).await {
            Ok(info) => info,
            Err(e) => {
                warn!(container = %id, error = %e, "inspect failed");
                self.detail = DetailPane::Error(e.to_string());
                return;
            }
        };

        let sample = match self.engine.sample_resource_usage(&id).await {
            Ok(sample) => Some(sample),
            Err(e) => {
                debug!(container = %id, error = %e, "stats unavailable");
                None
            }
        };

        self.detail = DetailPane::Loaded {
            details: ContainerDetails::from_inspect(&info),
            sample,
        };
    }

    fn render(&self, frame: &mut Frame) {
        let view = DashboardView {
            state: &self.state,
            detail: &self.detail,
            status: &self.status,
            palette: &self.palette,
        };
        dashboard::render(frame, &view);
    }
}
