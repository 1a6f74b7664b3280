//! WiFi signal strength bars: ▂▄▆█ with color thresholds.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

/// Returns a styled `Span` with signal bars based on link quality (0-100).
///
/// | Bars    | Quality | Color          |
/// |---------|---------|----------------|
/// | `▂▄▆█` | >= 75   | Success Green  |
/// | `▂▄▆ ` | 50-74   | Neon Cyan      |
/// | `▂▄  ` | 30-49   | Electric Yellow|
/// | `▂   ` | 10-29   | Coral          |
/// | `·   ` | < 10    | Error Red      |
pub fn signal_span(quality: u8) -> Span<'static> {
    let (bars, color) = match quality {
        75.. => ("▂▄▆█", theme::SUCCESS_GREEN),
        50..=74 => ("▂▄▆ ", theme::NEON_CYAN),
        30..=49 => ("▂▄  ", theme::ELECTRIC_YELLOW),
        10..=29 => ("▂   ", theme::CORAL),
        _ => ("·   ", theme::ERROR_RED),
    };

    Span::styled(bars, Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(signal_span(100).content, "▂▄▆█");
        assert_eq!(signal_span(75).content, "▂▄▆█");
        assert_eq!(signal_span(74).content, "▂▄▆ ");
        assert_eq!(signal_span(30).content, "▂▄  ");
        assert_eq!(signal_span(10).content, "▂   ");
        assert_eq!(signal_span(0).content, "·   ");
    }
}
