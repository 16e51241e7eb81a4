//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::status::HealthState;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic selection based on the
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for healthy endpoints.
    pub healthy: Color,
    /// Color for failing endpoints.
    pub error: Color,
    /// Color for endpoints awaiting their first (or next) check.
    pub pending: Color,
    /// Color for the water surface and tank walls.
    pub water: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            healthy: Color::Green,
            error: Color::Red,
            pending: Color::DarkGray,
            water: Color::Blue,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            healthy: Color::Green,
            error: Color::Red,
            pending: Color::Gray,
            water: Color::Blue,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a health state
    pub fn status_style(&self, state: HealthState) -> Style {
        let color = match state {
            HealthState::Ok => self.healthy,
            HealthState::Error => self.error,
            HealthState::Pending => self.pending,
        };
        Style::default().fg(color)
    }
}

/// Parse an endpoint's display color name. Unknown names fall back to the
/// theme highlight.
pub fn endpoint_color(name: &str, theme: &Theme) -> Color {
    match name.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => theme.highlight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_color_names_parse() {
        let theme = Theme::dark();
        assert_eq!(endpoint_color("green", &theme), Color::Green);
        assert_eq!(endpoint_color("MAGENTA", &theme), Color::Magenta);
    }

    #[test]
    fn unknown_color_falls_back_to_highlight() {
        let theme = Theme::dark();
        assert_eq!(endpoint_color("chartreuse", &theme), theme.highlight);
    }
}
