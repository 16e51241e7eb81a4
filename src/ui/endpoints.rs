//! Endpoints view rendering.
//!
//! A table of all endpoints with health status, last check time, and the
//! most recent failure reason.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::status::{epoch_ms, EndpointHealth, HealthState};

/// Render the endpoints table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let statuses = &app.statuses;

    let header = Row::new(vec![
        Cell::from("URL"),
        Cell::from("Description"),
        Cell::from("Status"),
        Cell::from("Last check"),
        Cell::from("Message"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .registry
        .iter()
        .map(|endpoint| {
            let health = statuses.get(&endpoint.id);
            let state = health.map_or(HealthState::Pending, |h| h.state);
            let status_style = app.theme.status_style(state);

            Row::new(vec![
                Cell::from(endpoint.url.clone()),
                Cell::from(endpoint.description.clone().unwrap_or_default()),
                Cell::from(state.symbol()).style(status_style),
                Cell::from(format_last_check(health)),
                Cell::from(
                    health
                        .and_then(|h| h.message.clone())
                        .unwrap_or_else(|| "-".to_string()),
                )
                .style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Fill(3),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .title(format!(" Endpoints ({}) ", app.registry.len())),
        )
        .row_highlight_style(app.theme.selected);

    let mut state = TableState::default();
    if !app.registry.is_empty() {
        state.select(Some(app.selected_index.min(app.registry.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Format the age of the last check, e.g. "12s ago".
fn format_last_check(health: Option<&EndpointHealth>) -> String {
    let Some(checked_at) = health.and_then(|h| h.last_checked) else {
        return "never".to_string();
    };
    format_age(epoch_ms().saturating_sub(checked_at))
}

fn format_age(age_ms: u64) -> String {
    let secs = age_ms / 1000;
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
