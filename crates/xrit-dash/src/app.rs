//! App: single-owner event loop for the dashboard.
//!
//! Architecture:
//! - `App` owns the `AcquisitionController`, `AppState` and every panel.
//! - Network work (schedule fetches, receiver polls) runs in spawned tasks
//!   whose results come back as `AppMessage`s on one mpsc channel.
//! - The HTTP API reads a watch snapshot of the acquisition state and asks
//!   for retries through `ApiCommand`s.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use dop_core::clock::{Clock, ClockReading, SystemClock};
use dop_core::config::Config;
use dop_core::controller::{self, AcquisitionController, AcquisitionTicket};
use dop_core::error::{AcquireError, FetchError};
use dop_core::schedule::{AcquisitionState, AcquisitionStatus};
use dop_core::source::{Acquired, HttpScheduleSource};
use dop_core::status::{LiveStatus, ReceiverInfo, StatusClient};

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{
        clock::ClockPanel, header::Header, schedule_panel::SchedulePanel,
        status_panel::StatusPanel,
    },
    http::ApiCommand,
    theme::{style_muted, C_BG, C_PRIMARY},
};

/// Live-status poll period until the receiver reports its own.
const DEFAULT_POLL: Duration = Duration::from_secs(2);

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Acquired(AcquisitionTicket, Result<Acquired, AcquireError>),
    ReceiverInfo(Result<ReceiverInfo, FetchError>),
    LiveStatus(Result<LiveStatus, FetchError>),
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    config: Config,
    controller: AcquisitionController<HttpScheduleSource>,
    status_client: StatusClient,
    clock: SystemClock,
    snapshot_tx: watch::Sender<AcquisitionState>,

    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    clock_panel: ClockPanel,
    schedule: SchedulePanel,
    status: StatusPanel,

    // ── Session bookkeeping ───────────────────────────────────────────────────
    tx: Option<mpsc::Sender<AppMessage>>,
    /// Receiver configuration not yet known.
    info_pending: bool,
    live_in_flight: bool,
    /// New live-poll period reported by the receiver, applied by `run`.
    poll_interval: Option<Duration>,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        controller: AcquisitionController<HttpScheduleSource>,
        status_client: StatusClient,
        snapshot_tx: watch::Sender<AcquisitionState>,
    ) -> Self {
        let clock = SystemClock;
        let now = clock.now();
        let state = AppState::new(
            ClockReading::at(now),
            controller.window(&now),
            controller.downlink().to_string(),
        );
        Self {
            config,
            controller,
            status_client,
            clock,
            snapshot_tx,
            state,
            header: Header::new(),
            clock_panel: ClockPanel::new(),
            schedule: SchedulePanel::new(),
            status: StatusPanel::new(),
            tx: None,
            info_pending: true,
            live_in_flight: false,
            poll_interval: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut api_rx: mpsc::Receiver<ApiCommand>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.tx = Some(tx.clone());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // A configured downlink does not need the receiver to answer first.
        if !self.controller.downlink().is_empty() {
            self.start_acquisition(false);
        }

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut clock_tick = tokio::time::interval(self.config.dashboard.clock_interval());
        clock_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut refresh_tick = tokio::time::interval(self.config.dashboard.refresh_interval());
        refresh_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // First tick fires immediately and asks the receiver for its config.
        let mut status_tick = tokio::time::interval(DEFAULT_POLL);
        status_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                Some(cmd) = api_rx.recv() => {
                    match cmd {
                        ApiCommand::Retry => self.apply_action(Action::Retry),
                    }
                    needs_redraw = true;
                }

                _ = clock_tick.tick() => {
                    self.on_clock_tick();
                    needs_redraw = true;
                }

                _ = refresh_tick.tick() => {
                    self.refresh_window();
                    needs_redraw = true;
                }

                _ = status_tick.tick() => {
                    if self.info_pending {
                        self.request_info();
                    } else {
                        self.request_live();
                    }
                }
            }

            if let Some(period) = self.poll_interval.take() {
                status_tick = tokio::time::interval(period);
                status_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Acquisition ───────────────────────────────────────────────────────────

    /// Begin (or restart) acquisition and run the fetch in the background.
    fn start_acquisition(&mut self, manual: bool) {
        let now = self.clock.now();
        let ticket = if manual {
            self.controller.retry(&now)
        } else {
            self.controller.begin(&now)
        };
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&mut self, ticket: AcquisitionTicket) {
        self.publish();
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let source = self.controller.source().clone();
        let timeout = self.controller.timeout();
        tokio::spawn(async move {
            let outcome = controller::fetch(&source, &ticket, timeout).await;
            let _ = tx.send(AppMessage::Acquired(ticket, outcome)).await;
        });
    }

    /// Push the current acquisition state to the HTTP API and panels.
    fn publish(&mut self) {
        self.snapshot_tx.send_replace(self.controller.state().clone());
        self.refresh_window();
    }

    fn refresh_window(&mut self) {
        let now = self.clock.now();
        self.state.window = self.controller.window(&now);
        self.state.downlink = self.controller.downlink().to_string();
    }

    fn on_clock_tick(&mut self) {
        let now = self.clock.now();
        self.state.clock = ClockReading::at(now);
        if let Some(ticket) = self.controller.on_tick(&now) {
            self.spawn_fetch(ticket);
        }
        let state = &self.state;
        let panels: [&mut dyn Component; 4] = [
            &mut self.header,
            &mut self.clock_panel,
            &mut self.schedule,
            &mut self.status,
        ];
        for panel in panels {
            panel.tick(state);
        }
    }

    // ── Receiver status ───────────────────────────────────────────────────────

    fn request_info(&mut self) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let client = self.status_client.clone();
        tokio::spawn(async move {
            let result = client.fetch_info().await;
            let _ = tx.send(AppMessage::ReceiverInfo(result)).await;
        });
    }

    fn request_live(&mut self) {
        if self.live_in_flight {
            return;
        }
        let Some(tx) = self.tx.clone() else {
            return;
        };
        self.live_in_flight = true;
        let client = self.status_client.clone();
        tokio::spawn(async move {
            let result = client.fetch_live().await;
            let _ = tx.send(AppMessage::LiveStatus(result)).await;
        });
    }

    fn on_receiver_info(&mut self, result: Result<ReceiverInfo, FetchError>) {
        match result {
            Ok(info) => {
                info!(
                    "[rx] {} {} xrit-rx v{} (poll every {}s)",
                    info.spacecraft, info.downlink, info.version, info.interval
                );
                self.info_pending = false;
                self.poll_interval = Some(Duration::from_secs(info.interval.max(1)));

                // A downlink set in config always wins over the receiver's.
                if self.config.source.downlink.is_empty()
                    && self.controller.downlink() != info.downlink
                {
                    self.controller.set_downlink(info.downlink.clone());
                    self.start_acquisition(false);
                }
                self.state.receiver = Some(info);
                self.state.receiver_error = None;
            }
            Err(e) => {
                warn!("[rx] receiver info unavailable: {}", e);
                self.state.receiver_error = Some(e.summary());
                // Without a downlink from anywhere, try the cached copy anyway.
                if self.controller.state().status == AcquisitionStatus::Empty {
                    self.start_acquisition(false);
                }
            }
        }
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for action in self.handle_key(key) {
                        self.apply_action(action);
                    }
                }
                Event::Resize(..) => {}
                _ => return false,
            },

            AppMessage::Acquired(ticket, outcome) => {
                if self.controller.complete(&ticket, outcome) {
                    self.publish();
                }
            }

            AppMessage::ReceiverInfo(result) => self.on_receiver_info(result),

            AppMessage::LiveStatus(result) => {
                self.live_in_flight = false;
                match result {
                    Ok(live) => {
                        self.state.live = Some(live);
                        self.state.live_error = None;
                    }
                    Err(e) => {
                        debug!("[rx] live status failed: {}", e);
                        self.state.live_error = Some(e.summary());
                    }
                }
            }
        }
        true
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc if key.modifiers == KeyModifiers::NONE => {
                return vec![Action::Quit];
            }
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            _ => {}
        }

        let state = &self.state;
        let panels: [&mut dyn Component; 4] = [
            &mut self.header,
            &mut self.clock_panel,
            &mut self.schedule,
            &mut self.status,
        ];
        let mut actions = Vec::new();
        for panel in panels {
            let produced = panel.handle_key(key, state);
            if !produced.is_empty() {
                debug!("{:?} handled {:?}", panel.id(), key.code);
            }
            actions.extend(produced);
        }
        actions
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::Retry => self.start_acquisition(true),
            Action::Quit => self.should_quit = true,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header.min_height()),
                Constraint::Min(self.schedule.min_height()),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(34)])
            .split(outer[1]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.clock_panel.min_height()),
                Constraint::Min(self.status.min_height()),
            ])
            .split(body[1]);

        let state = &self.state;
        self.header.draw(frame, outer[0], state);
        self.schedule.draw(frame, body[0], state);
        self.clock_panel.draw(frame, side[0], state);
        self.status.draw(frame, side[1], state);

        let keys = Line::from(vec![
            Span::styled(" r", Style::default().fg(C_PRIMARY)),
            Span::styled(" retry  ", style_muted()),
            Span::styled("q", Style::default().fg(C_PRIMARY)),
            Span::styled(" quit", style_muted()),
        ]);
        frame.render_widget(Paragraph::new(keys), outer[2]);
    }
}
