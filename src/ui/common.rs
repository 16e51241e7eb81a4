//! Common UI components shared across views.
//!
//! Header bar, tab bar, status bar, help overlay, and the most-recent-failure
//! banner.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::status::HealthState;

/// Render the header bar with the overall health overview.
///
/// Displays: status indicator, endpoint counts by health, registry source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (ok, error, pending) = app.health_counts();
    let total = ok + error + pending;

    if total == 0 {
        let line = Line::from(vec![
            Span::styled(" REEFWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Empty tank - add endpoints to the registry file"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Overall indicator is the worst state present.
    let overall = if error > 0 {
        HealthState::Error
    } else if pending > 0 {
        HealthState::Pending
    } else {
        HealthState::Ok
    };

    let line = Line::from(vec![
        Span::styled(" REEFWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("● ", app.theme.status_style(overall)),
        Span::raw(format!("{total} endpoints: ")),
        Span::styled(format!("{ok} up"), app.theme.status_style(HealthState::Ok)),
        Span::raw(" / "),
        Span::styled(
            format!("{error} down"),
            app.theme.status_style(HealthState::Error),
        ),
        Span::raw(" / "),
        Span::styled(
            format!("{pending} checking"),
            app.theme.status_style(HealthState::Pending),
        ),
        Span::raw(format!(" | {}", app.source_description())),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the view tabs.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = [View::Tank, View::Endpoints]
        .iter()
        .map(|v| Line::from(v.label()))
        .collect::<Vec<_>>();

    let selected = match app.current_view {
        View::Tank => 0,
        View::Endpoints => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");
    frame.render_widget(tabs, area);
}

/// Render the status bar with key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.current_view {
        View::Tank => " q quit | Tab view | p probe now | d dismiss | ? help",
        View::Endpoints => " q quit | Tab view | j/k select | p probe now | d dismiss | ? help",
    };
    let line = Line::from(Span::styled(hints, app.theme.tab_inactive));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the most-recent-failure banner, if one is fresh.
///
/// Sits at the bottom of the content area and disappears on its own after
/// the failure expires, or immediately on dismiss.
pub fn render_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(failure) = app.store.current_failure() else {
        return;
    };

    let text = format!(" {} - {} ", failure.url, failure.message);
    let line = Line::from(vec![
        Span::styled(
            " DOWN ",
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::styled(text, Style::default().fg(app.theme.error)),
        Span::styled("(d to dismiss)", app.theme.tab_inactive),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the help overlay.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let width = 46.min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(2));
    let popup = Rect::new(
        (area.width.saturating_sub(width)) / 2,
        (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let lines = vec![
        Line::from(""),
        Line::from("  q          quit"),
        Line::from("  Tab        next view"),
        Line::from("  1 / 2      tank / endpoints view"),
        Line::from("  j/k, ↑/↓   select endpoint"),
        Line::from("  p          probe all endpoints now"),
        Line::from("  d          dismiss failure banner"),
        Line::from("  ?          toggle this help"),
        Line::from(""),
        Line::from("  A fish floats belly-up at the surface"),
        Line::from("  while its endpoint is down, and dives"),
        Line::from("  back once it recovers."),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
