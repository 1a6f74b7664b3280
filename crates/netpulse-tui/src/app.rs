//! Application core: event loop, monitor lifecycle, action dispatch.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use netpulse_core::{Monitor, MonitorConfig, PollState, PollStatus, SystemSource};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader, Rates};
use crate::screens::create_screen;
use crate::theme;

/// Top-level application state and event loop.
pub struct App {
    /// Polling configuration handed to the monitor on mount.
    config: MonitorConfig,
    /// The network monitor screen.
    screen: Box<dyn Component>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Last state published by the monitor, for the status bar.
    status: PollStatus,
    /// Action sender: components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver: main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: MonitorConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            config,
            screen: create_screen(),
            running: true,
            help_visible: false,
            status: PollStatus::default(),
            action_tx,
            action_rx,
        }
    }

    /// Run the TUI: mount the monitor, loop until quit, then unmount.
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()?;
        self.screen.set_focused(true);
        debug!(screen = self.screen.id(), "screen mounted");

        // Mount: the first poll cycle starts immediately
        let monitor = Monitor::start(
            SystemSource::new(self.config.probe_timeout),
            self.config.clone(),
        );
        let mut events = EventReader::new(monitor.subscribe(), Rates::default());

        info!("TUI event loop started");
        let result = self.event_loop(&mut terminal, &mut events, &monitor).await;

        // Unmount: nothing is published after this point
        events.stop();
        monitor.shutdown().await;
        ratatui::restore();

        info!("TUI event loop ended");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        events: &mut EventReader,
        monitor: &Monitor<SystemSource>,
    ) -> Result<()> {
        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    debug!(w, h, "terminal resized");
                    self.action_tx.send(Action::Render)?;
                }
                Event::Poll(status) => self.action_tx.send(Action::PollUpdated(status))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                match action {
                    Action::Refresh => {
                        debug!("manual refresh");
                        monitor.refresh();
                    }
                    Action::Render => {
                        terminal.draw(|frame| self.render(frame))?;
                    }
                    _ => {}
                }
                self.process_action(&action)?;
            }
        }
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else is delegated to the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Search bar owns the keyboard while it's focused
        if self.screen.captures_input() {
            return self.screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    /// Process a single action: update app state and propagate to the screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // Drawing and polling are handled in the main loop
            Action::Render | Action::Refresh => {}

            other => {
                if let Action::PollUpdated(status) = other {
                    self.status = (**status).clone();
                }
                if let Some(follow_up) = self.screen.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }

        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Render the bottom status bar with poll state, last update and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = match &self.status.state {
            _ if self.status.is_loading() => {
                Span::styled("◐ polling", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
            PollState::Ready(_) => Span::styled("● live", Style::default().fg(theme::SUCCESS_GREEN)),
            PollState::Failed(_) => Span::styled("○ error", Style::default().fg(theme::ERROR_RED)),
            PollState::Loading => Span::styled("○ waiting", theme::key_hint()),
        };

        let updated = self.status.updated_at.map_or_else(
            || "not updated yet".to_owned(),
            |at| format!("updated {}", at.format("%H:%M:%S")),
        );

        let line = Line::from(vec![
            Span::raw(" "),
            indicator,
            Span::styled(format!(" │ {updated}"), theme::status_bar()),
            Span::styled(
                format!(" │ every {}", format_interval(self.config.interval)),
                theme::key_hint(),
            ),
            Span::styled(" │ r refresh  / search  ? help  q quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 44u16.min(area.width.saturating_sub(4));
        let help_height = 16u16.min(area.height.saturating_sub(2));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;

        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(key, theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled("  Navigation", Style::default().fg(theme::NEON_CYAN))),
            Line::from(Span::styled("  ──────────", theme::key_hint())),
            entry("  j/k ↑/↓   ", "Move up/down"),
            entry("  Enter     ", "Run selected action"),
            Line::from(""),
            Line::from(Span::styled("  Global", Style::default().fg(theme::NEON_CYAN))),
            Line::from(Span::styled("  ──────", theme::key_hint())),
            entry("  r         ", "Refresh now"),
            entry("  /         ", "Search"),
            entry("  Esc       ", "Clear search"),
            entry("  ?         ", "This help"),
            entry("  q         ", "Quit"),
            Line::from(""),
            Line::from(Span::styled("        Esc or ? to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

/// `2s`, `500ms`, `1.5s`.
fn format_interval(interval: Duration) -> String {
    let millis = interval.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else if millis % 1000 == 0 {
        format!("{}s", interval.as_secs())
    } else {
        format!("{:.1}s", interval.as_secs_f64())
    }
}
