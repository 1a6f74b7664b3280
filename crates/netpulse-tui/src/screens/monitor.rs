//! Network Monitor screen: sectioned status list with search, a refresh
//! action, and an error view that replaces the list when a poll fails.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use netpulse_core::{NetworkSnapshot, PollStatus};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::signal_bars;

const MEASURING: &str = "Measuring...";
const CHECKING: &str = "Checking...";
const SEARCH_PLACEHOLDER: &str = "Network Statistics";

// ── Row model ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Status,
    Actions,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Self::Status => "Network Status",
            Self::Actions => "Actions",
        }
    }
}

/// Trailing decoration on a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessory {
    ArrowDown,
    ArrowUp,
    Signal { strength: String, quality: u8 },
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub section: Section,
    pub icon: &'static str,
    pub tint: Color,
    pub title: &'static str,
    pub subtitle: String,
    /// `subtitle` is a placeholder, not a measurement.
    pub pending: bool,
    pub accessory: Option<Accessory>,
    /// Dispatched when the row is activated with Enter.
    pub action: Option<Action>,
}

impl StatusRow {
    fn status(
        icon: &'static str,
        tint: Color,
        title: &'static str,
        (subtitle, pending): (String, bool),
    ) -> Self {
        Self {
            section: Section::Status,
            icon,
            tint,
            title,
            subtitle,
            pending,
            accessory: None,
            action: None,
        }
    }

    fn with_accessory(mut self, accessory: Accessory) -> Self {
        self.accessory = Some(accessory);
        self
    }
}

fn field(
    snapshot: Option<&NetworkSnapshot>,
    get: impl Fn(&NetworkSnapshot) -> &str,
    placeholder: &str,
) -> (String, bool) {
    snapshot.map_or_else(|| (placeholder.to_owned(), true), |s| (get(s).to_owned(), false))
}

/// Build the list rows for the current snapshot, or placeholders when no
/// snapshot has been measured yet.
pub fn build_rows(snapshot: Option<&NetworkSnapshot>) -> Vec<StatusRow> {
    let mut rows = vec![
        StatusRow::status(
            "◉",
            theme::SUCCESS_GREEN,
            "Download Speed",
            field(snapshot, |s| s.download_speed.as_str(), MEASURING),
        )
        .with_accessory(Accessory::ArrowDown),
        StatusRow::status(
            "◉",
            theme::LIGHT_BLUE,
            "Upload Speed",
            field(snapshot, |s| s.upload_speed.as_str(), MEASURING),
        )
        .with_accessory(Accessory::ArrowUp),
        StatusRow::status(
            "◷",
            theme::ELECTRIC_YELLOW,
            "Latency",
            field(snapshot, |s| s.latency.as_str(), MEASURING),
        ),
        StatusRow::status(
            "⌬",
            theme::ELECTRIC_PURPLE,
            "Network Type",
            field(snapshot, |s| s.network_type.as_str(), CHECKING),
        ),
        StatusRow::status(
            "◍",
            theme::SUNSET_ORANGE,
            "IP Address",
            field(snapshot, |s| s.ip_address.as_str(), CHECKING),
        ),
    ];

    if let Some(link) = snapshot.and_then(|s| s.wifi.as_ref()) {
        rows.push(
            StatusRow::status(
                "◔",
                theme::ERROR_RED,
                "WiFi Network",
                (link.ssid.clone(), false),
            )
            .with_accessory(Accessory::Signal {
                strength: link.signal_strength.clone(),
                quality: link.quality,
            }),
        );
    }

    rows.push(StatusRow {
        section: Section::Actions,
        icon: "↻",
        tint: theme::NEON_CYAN,
        title: "Refresh Statistics",
        subtitle: String::new(),
        pending: false,
        accessory: None,
        action: Some(Action::Refresh),
    });

    rows
}

// ── Search ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Search {
    /// The search bar has keyboard focus.
    editing: bool,
    query: String,
}

impl Search {
    fn is_visible(&self) -> bool {
        self.editing || !self.query.is_empty()
    }

    fn matches(&self, row: &StatusRow) -> bool {
        self.query.is_empty()
            || row
                .title
                .to_lowercase()
                .contains(&self.query.to_lowercase())
    }

    fn clear(&mut self) {
        self.editing = false;
        self.query.clear();
    }
}

// ── Screen ───────────────────────────────────────────────────────────

/// Loading indicator shown in the list title while a cycle is in flight.
fn throbber() -> Throbber<'static> {
    Throbber::default()
        .throbber_set(BRAILLE_SIX)
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE))
}

pub struct MonitorScreen {
    focused: bool,
    status: PollStatus,
    rows: Vec<StatusRow>,
    search: Search,
    /// Index into the visible (filtered) rows.
    selected: usize,
    throbber_state: ThrobberState,
}

impl MonitorScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            status: PollStatus::default(),
            rows: build_rows(None),
            search: Search::default(),
            selected: 0,
            throbber_state: ThrobberState::default(),
        }
    }

    fn visible_rows(&self) -> Vec<&StatusRow> {
        self.rows
            .iter()
            .filter(|row| self.search.matches(row))
            .collect()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1).min(len - 1)
        } else {
            self.selected.saturating_sub(1)
        };
    }

    fn selected_row(&self) -> Option<&StatusRow> {
        self.visible_rows().get(self.selected).copied()
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => self.search.clear(),
            KeyCode::Enter => self.search.editing = false,
            KeyCode::Backspace => {
                self.search.query.pop();
            }
            KeyCode::Down => self.move_selection(true),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.query.push(ch);
                self.selected = 0;
            }
            _ => {}
        }
        self.clamp_selection();
        None
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_error(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title(" Error ")
            .title_style(
                Style::default()
                    .fg(theme::ERROR_RED)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_error());

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Error",
                Style::default()
                    .fg(theme::ERROR_RED)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(format!(" {message}"), theme::table_row())),
            Line::from(""),
            Line::from(vec![
                Span::styled(" r ", theme::key_hint_key()),
                Span::styled("retry now", theme::key_hint()),
            ]),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let border = if self.search.editing {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let line = if self.search.query.is_empty() {
            Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(SEARCH_PLACEHOLDER, theme::placeholder()),
            ])
        } else {
            let cursor = if self.search.editing { "▏" } else { "" };
            Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::styled(
                    format!("{}{cursor}", self.search.query),
                    Style::default().fg(theme::NEON_CYAN),
                ),
            ])
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn accessory_line(accessory: Option<&Accessory>) -> Line<'static> {
        match accessory {
            None => Line::from(""),
            Some(Accessory::ArrowDown) => {
                Line::from(Span::styled("↓", Style::default().fg(theme::SUCCESS_GREEN)))
            }
            Some(Accessory::ArrowUp) => {
                Line::from(Span::styled("↑", Style::default().fg(theme::LIGHT_BLUE)))
            }
            Some(Accessory::Signal { strength, quality }) => Line::from(vec![
                signal_bars::signal_span(*quality),
                Span::raw(" "),
                Span::styled(strength.clone(), theme::table_row()),
            ]),
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible_rows();
        if visible.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No matching statistics",
                theme::key_hint(),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        let mut rows = Vec::with_capacity(visible.len() + 2);
        let mut table_selected = None;
        let mut section = None;

        for (i, row) in visible.iter().enumerate() {
            if section != Some(row.section) {
                section = Some(row.section);
                rows.push(Row::new(vec![
                    Cell::from(""),
                    Cell::from(Span::styled(row.section.title(), theme::section_style())),
                ]));
            }

            let is_selected = i == self.selected;
            if is_selected {
                table_selected = Some(rows.len());
            }
            let prefix = if is_selected { "▸" } else { " " };
            let subtitle_style = if row.pending {
                theme::placeholder()
            } else {
                Style::default().fg(theme::NEON_CYAN)
            };

            rows.push(
                Row::new(vec![
                    Cell::from(Span::styled(row.icon, Style::default().fg(row.tint))),
                    Cell::from(format!("{prefix}{}", row.title)),
                    Cell::from(Span::styled(row.subtitle.clone(), subtitle_style)),
                    Cell::from(Self::accessory_line(row.accessory.as_ref())),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                }),
            );
        }

        let widths = [
            Constraint::Length(2),
            Constraint::Length(20),
            Constraint::Min(12),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths).row_highlight_style(theme::table_selected());

        let mut state = TableState::default().with_selected(table_selected);
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Default for MonitorScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for MonitorScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search.editing {
            return Ok(self.handle_search_key(key));
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                Ok(None)
            }
            KeyCode::Enter if self.status.state.error().is_none() => {
                Ok(self.selected_row().and_then(|row| row.action.clone()))
            }
            KeyCode::Esc if !self.search.query.is_empty() => {
                self.search.clear();
                self.clamp_selection();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::PollUpdated(status) => {
                self.status = (**status).clone();
                self.rows = build_rows(self.status.state.snapshot());
                self.clamp_selection();
            }
            Action::Tick if self.status.is_loading() => self.throbber_state.calc_next(),
            Action::OpenSearch => self.search.editing = true,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(message) = self.status.state.error() {
            Self::render_error(frame, area, message);
            return;
        }

        let mut title = vec![Span::raw(" Network Monitor ")];
        if self.status.is_loading() {
            title.push(throbber().to_symbol_span(&self.throbber_state));
            title.push(Span::raw(" "));
        }
        let block = Block::default()
            .title(Line::from(title))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let search_height = if self.search.is_visible() { 3 } else { 0 };
        let layout = Layout::vertical([
            Constraint::Length(search_height), // search bar
            Constraint::Min(1),                // list
            Constraint::Length(1),             // hints
        ])
        .split(inner);

        if self.search.is_visible() {
            self.render_search(frame, layout[0]);
        }
        self.render_list(frame, layout[1]);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh  ", theme::key_hint()),
            Span::styled("/ ", theme::key_hint_key()),
            Span::styled("search", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn captures_input(&self) -> bool {
        self.search.editing
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Network Monitor"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use netpulse_core::{PollState, WifiLink};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn snapshot(wifi: bool) -> NetworkSnapshot {
        NetworkSnapshot {
            download_speed: "10.00 Mbps".into(),
            upload_speed: "0.50 Mbps".into(),
            latency: "14.2 ms".into(),
            network_type: "wireless".into(),
            ip_address: "192.168.1.42".into(),
            wifi: wifi.then(|| WifiLink {
                ssid: "HomeNet".into(),
                signal_strength: "72%".into(),
                quality: 72,
            }),
        }
    }

    fn status(state: PollState) -> Action {
        Action::PollUpdated(Box::new(PollStatus {
            state,
            generation: 1,
            ..PollStatus::default()
        }))
    }

    fn ready(wifi: bool) -> Action {
        status(PollState::Ready(Arc::new(snapshot(wifi))))
    }

    fn press(screen: &mut MonitorScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_str(screen: &mut MonitorScreen, text: &str) {
        for ch in text.chars() {
            press(screen, KeyCode::Char(ch));
        }
    }

    fn titles(screen: &MonitorScreen) -> Vec<&'static str> {
        screen.visible_rows().iter().map(|r| r.title).collect()
    }

    fn draw(screen: &MonitorScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── Row model ───────────────────────────────────────────────

    #[test]
    fn placeholders_before_first_snapshot() {
        let rows = build_rows(None);
        let subtitles: Vec<&str> = rows.iter().map(|r| r.subtitle.as_str()).collect();
        assert_eq!(
            subtitles,
            vec![MEASURING, MEASURING, MEASURING, CHECKING, CHECKING, ""]
        );
        assert!(rows.iter().take(5).all(|r| r.pending));
    }

    #[test]
    fn wifi_row_only_with_link() {
        let without = build_rows(Some(&snapshot(false)));
        assert!(without.iter().all(|r| r.title != "WiFi Network"));

        let with = build_rows(Some(&snapshot(true)));
        let wifi = with.iter().find(|r| r.title == "WiFi Network").unwrap();
        assert_eq!(wifi.subtitle, "HomeNet");
        assert_eq!(
            wifi.accessory,
            Some(Accessory::Signal {
                strength: "72%".into(),
                quality: 72
            })
        );
    }

    #[test]
    fn only_refresh_row_has_an_action() {
        let rows = build_rows(Some(&snapshot(true)));
        let actionable: Vec<&str> = rows
            .iter()
            .filter(|r| r.action.is_some())
            .map(|r| r.title)
            .collect();
        assert_eq!(actionable, vec!["Refresh Statistics"]);
        assert_eq!(rows.last().unwrap().section, Section::Actions);
    }

    // ── Rendering ───────────────────────────────────────────────

    #[test]
    fn renders_placeholders_while_loading() {
        let screen = MonitorScreen::new();
        let text = draw(&screen);
        assert!(text.contains("Network Status"));
        assert!(text.contains("Measuring..."));
        assert!(text.contains("Checking..."));
        assert!(text.contains("Refresh Statistics"));
    }

    #[test]
    fn renders_snapshot_values() {
        let mut screen = MonitorScreen::new();
        screen.update(&ready(true)).unwrap();
        let text = draw(&screen);
        for expected in [
            "10.00 Mbps",
            "0.50 Mbps",
            "14.2 ms",
            "wireless",
            "192.168.1.42",
            "WiFi Network",
            "HomeNet",
            "72%",
            "Actions",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in:\n{text}");
        }
        assert!(!text.contains("Measuring..."));
    }

    #[test]
    fn error_replaces_list() {
        let mut screen = MonitorScreen::new();
        screen.update(&ready(true)).unwrap();
        screen
            .update(&status(PollState::Failed("Wi-Fi scan failed: nmcli crashed".into())))
            .unwrap();

        let text = draw(&screen);
        assert!(text.contains("Error"));
        assert!(text.contains("Wi-Fi scan failed: nmcli crashed"));
        assert!(!text.contains("Download Speed"));
        assert!(!text.contains("HomeNet"));
    }

    #[test]
    fn recovery_after_error_shows_list_again() {
        let mut screen = MonitorScreen::new();
        screen.update(&status(PollState::Failed("boom".into()))).unwrap();
        screen.update(&ready(false)).unwrap();

        let text = draw(&screen);
        assert!(!text.contains("boom"));
        assert!(text.contains("10.00 Mbps"));
    }

    #[test]
    fn throbber_in_title_while_polling() {
        let mut screen = MonitorScreen::new();
        assert!(draw(&screen).contains("╭ Network Monitor ─"));

        screen
            .update(&Action::PollUpdated(Box::new(PollStatus {
                in_flight: 1,
                ..PollStatus::default()
            })))
            .unwrap();
        let mut expected = ThrobberState::default();
        let symbol = |state: &ThrobberState| throbber().to_symbol_span(state).content.into_owned();
        assert!(draw(&screen).contains(&format!("Network Monitor {} ", symbol(&expected))));

        screen.update(&Action::Tick).unwrap();
        expected.calc_next();
        assert!(draw(&screen).contains(&format!("Network Monitor {} ", symbol(&expected))));
    }

    #[test]
    fn throbber_holds_still_when_idle() {
        let mut screen = MonitorScreen::new();
        screen.update(&ready(false)).unwrap();
        screen.update(&Action::Tick).unwrap();
        screen.update(&Action::Tick).unwrap();

        screen
            .update(&Action::PollUpdated(Box::new(PollStatus {
                in_flight: 1,
                ..PollStatus::default()
            })))
            .unwrap();
        let first = throbber().to_symbol_span(&ThrobberState::default()).content.into_owned();
        assert!(draw(&screen).contains(&format!("Network Monitor {first} ")));
    }

    #[test]
    fn search_placeholder_shown_when_opened() {
        let mut screen = MonitorScreen::new();
        screen.update(&Action::OpenSearch).unwrap();
        assert!(screen.captures_input());
        assert!(draw(&screen).contains(SEARCH_PLACEHOLDER));
    }

    // ── Keys ────────────────────────────────────────────────────

    #[test]
    fn enter_on_refresh_row_dispatches_refresh() {
        let mut screen = MonitorScreen::new();
        screen.update(&ready(false)).unwrap();

        assert_eq!(press(&mut screen, KeyCode::Enter), None);
        for _ in 0..10 {
            press(&mut screen, KeyCode::Char('j'));
        }
        assert_eq!(screen.selected_row().unwrap().title, "Refresh Statistics");
        assert_eq!(press(&mut screen, KeyCode::Enter), Some(Action::Refresh));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut screen = MonitorScreen::new();
        press(&mut screen, KeyCode::Up);
        assert_eq!(screen.selected, 0);
        for _ in 0..20 {
            press(&mut screen, KeyCode::Down);
        }
        assert_eq!(screen.selected, screen.visible_rows().len() - 1);
    }

    #[test]
    fn search_filters_by_title_case_insensitively() {
        let mut screen = MonitorScreen::new();
        screen.update(&ready(true)).unwrap();
        screen.update(&Action::OpenSearch).unwrap();

        type_str(&mut screen, "SPEED");
        assert_eq!(titles(&screen), vec!["Download Speed", "Upload Speed"]);

        type_str(&mut screen, " ");
        assert!(titles(&screen).is_empty());

        for _ in 0.."SPEED ".len() {
            press(&mut screen, KeyCode::Backspace);
        }
        assert_eq!(titles(&screen).len(), 7);
    }

    #[test]
    fn search_text_is_not_a_command() {
        let mut screen = MonitorScreen::new();
        screen.update(&Action::OpenSearch).unwrap();

        // `j` is typed into the query rather than moving the selection
        type_str(&mut screen, "refj");
        assert!(titles(&screen).is_empty());
        assert!(draw(&screen).contains("No matching statistics"));
    }

    #[test]
    fn enter_keeps_filter_and_esc_clears_it() {
        let mut screen = MonitorScreen::new();
        screen.update(&Action::OpenSearch).unwrap();
        type_str(&mut screen, "refresh");
        press(&mut screen, KeyCode::Enter);

        assert!(!screen.captures_input());
        assert_eq!(titles(&screen), vec!["Refresh Statistics"]);
        assert_eq!(press(&mut screen, KeyCode::Enter), Some(Action::Refresh));

        press(&mut screen, KeyCode::Esc);
        assert_eq!(titles(&screen).len(), 6);
    }

    #[test]
    fn esc_while_typing_clears_and_closes() {
        let mut screen = MonitorScreen::new();
        screen.update(&Action::OpenSearch).unwrap();
        type_str(&mut screen, "lat");
        assert_eq!(titles(&screen), vec!["Latency"]);

        press(&mut screen, KeyCode::Esc);
        assert!(!screen.captures_input());
        assert_eq!(titles(&screen).len(), 6);
        assert!(!draw(&screen).contains(SEARCH_PLACEHOLDER));
    }

    #[test]
    fn enter_does_nothing_on_error_view() {
        let mut screen = MonitorScreen::new();
        screen.update(&status(PollState::Failed("boom".into()))).unwrap();
        for _ in 0..10 {
            press(&mut screen, KeyCode::Down);
        }
        assert_eq!(press(&mut screen, KeyCode::Enter), None);
    }
}
