//! The tank view: the ambient aquarium.
//!
//! Projects each fish's pose into the tank rectangle. The fish's x
//! coordinate maps to a column, its depth to a row (surface at the top),
//! and the z coordinate is flattened away. Glyphs face the swim direction
//! and flip belly-up past half a roll.

use std::f32::consts::FRAC_PI_2;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::motion::{Pose, SURFACE_Y};
use crate::status::HealthState;
use crate::ui::theme::endpoint_color;

/// Horizontal world extent mapped onto the tank width.
const X_RANGE: f32 = 4.0;

/// Render the tank.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 8 || inner.height < 4 {
        return;
    }

    let width = inner.width as usize;
    let height = inner.height as usize;

    // Character grid, row-major, with one style per cell.
    let mut grid = vec![vec![(' ', Style::default()); width]; height];

    // Water surface along the top row.
    let surface_style = Style::default().fg(app.theme.water);
    for cell in &mut grid[0] {
        *cell = ('~', surface_style);
    }

    let statuses = &app.statuses;
    let selected_id = app.selected_id();

    for (id, pose) in &app.poses {
        let endpoint = match app.registry.get(id) {
            Some(e) => e,
            None => continue,
        };
        let state = statuses.get(id).map(|h| h.state);

        let color = match state {
            Some(HealthState::Error) => app.theme.error,
            Some(HealthState::Pending) | None => app.theme.pending,
            Some(HealthState::Ok) => endpoint_color(&endpoint.color, &app.theme),
        };
        let style = Style::default().fg(color);

        let row = project_row(pose.y, height);
        let col = project_col(pose.x, width);
        let glyph = fish_glyph(pose);

        draw_text(&mut grid, row, col, glyph, style);

        // Label the selected endpoint next to its fish.
        if selected_id.as_deref() == Some(id.as_str()) {
            let label = format!(" {}", truncate(&endpoint.url, 24));
            draw_text(&mut grid, row, col + glyph.chars().count(), &label, style);
        }
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(c, style)| Span::styled(c.to_string(), style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Map a depth to a grid row: the surface sits on row 0, the deepest
/// baseline near the bottom.
fn project_row(y: f32, height: usize) -> usize {
    let span = 2.0 * SURFACE_Y;
    let normalized = ((SURFACE_Y - y) / span).clamp(0.0, 1.0);
    let row = (normalized * (height.saturating_sub(2)) as f32) as usize;
    row.min(height - 1)
}

/// Map a world x to a grid column, leaving room for the glyph.
fn project_col(x: f32, width: usize) -> usize {
    let normalized = ((x + X_RANGE) / (2.0 * X_RANGE)).clamp(0.0, 1.0);
    let col = (normalized * width.saturating_sub(4) as f32) as usize;
    col.min(width - 1)
}

/// Pick the fish glyph from its heading and roll.
fn fish_glyph(pose: &Pose) -> &'static str {
    let facing_right = pose.yaw.cos() >= 0.0;
    let belly_up = pose.roll.abs() > FRAC_PI_2;
    match (facing_right, belly_up) {
        (true, false) => "><>",
        (false, false) => "<><",
        (true, true) => "><x",
        (false, true) => "x><",
    }
}

fn draw_text(grid: &mut [Vec<(char, Style)>], row: usize, col: usize, text: &str, style: Style) {
    if row >= grid.len() {
        return;
    }
    let width = grid[row].len();
    for (i, c) in text.chars().enumerate() {
        let x = col + i;
        if x >= width {
            break;
        }
        grid[row][x] = (c, style);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn pose(x: f32, y: f32, yaw: f32, roll: f32) -> Pose {
        Pose {
            x,
            y,
            z: 0.0,
            yaw,
            roll,
        }
    }

    #[test]
    fn surface_projects_to_top_row() {
        assert_eq!(project_row(SURFACE_Y, 20), 0);
        assert!(project_row(-SURFACE_Y, 20) >= 17);
    }

    #[test]
    fn x_extremes_stay_inside_the_grid() {
        assert_eq!(project_col(-X_RANGE, 40), 0);
        assert!(project_col(X_RANGE, 40) < 40);
        // Far out-of-range values clamp instead of wrapping.
        assert_eq!(project_col(-100.0, 40), 0);
    }

    #[test]
    fn glyph_follows_heading_and_roll() {
        assert_eq!(fish_glyph(&pose(0.0, 0.0, 0.0, 0.0)), "><>");
        assert_eq!(fish_glyph(&pose(0.0, 0.0, PI, 0.0)), "<><");
        assert_eq!(fish_glyph(&pose(0.0, 0.0, 0.0, PI)), "><x");
        assert_eq!(fish_glyph(&pose(0.0, 0.0, PI, PI)), "x><");
    }

    #[test]
    fn truncate_preserves_short_strings() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-endpoint-url", 8), "a-very-…");
    }
}
