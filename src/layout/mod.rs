//! Geometry layout engine — converts the activity grid into exact
//! vector cutting geometry.
//!
//! The engine computes everything in a natural coordinate frame
//! (x from the left sheet edge, y from the top, increasing with time)
//! and leaves the final reflection to the emitter / to
//! [`RollGeometry::mirrored`]: the mirror is a single transform
//! applied after all segmentation and offset math, never baked into
//! intermediate coordinates.

mod metrics;
mod segment;

use tracing::debug;

use crate::config::RollConfig;
use crate::model::{ActivityGrid, Line, RollGeometry, RoundedRect};
use metrics::Metrics;

pub use segment::split_segments;

/// Compute the full cutting geometry for one roll.
///
/// Degenerate grids (no rows, no runs) produce guide lines only; this
/// never fails.
#[tracing::instrument(skip_all)]
pub fn layout_roll(grid: &ActivityGrid, cfg: &RollConfig) -> RollGeometry {
    let m = Metrics::scale(cfg, grid.min_held_steps());

    let rows = grid.rows();
    let total_height =
        grid.steps() as f64 * m.unit_per_step + m.leading_margin + m.trailing_margin;
    let band = rows as f64 * m.note_height + rows.saturating_sub(1) as f64 * m.vertical_gap;
    let total_width = band + m.guide_span + m.extra_width;

    let mut cut_lines = Vec::new();
    let left_guide_x = m.guide_inset;
    let right_guide_x = m.guide_inset + m.guide_span;
    dash_column(&mut cut_lines, left_guide_x, total_height, &m);
    dash_column(&mut cut_lines, right_guide_x, total_height, &m);
    if cfg.horizontal_guides {
        dash_row(&mut cut_lines, 0.0, left_guide_x, right_guide_x, &m);
        dash_row(&mut cut_lines, total_height, left_guide_x, right_guide_x, &m);
    }

    let mut holes = Vec::new();
    let passes = if cfg.double_cut { 2 } else { 1 };
    for row in 0..rows {
        let mut x = row as f64 * (m.note_height + m.vertical_gap) + m.vertical_offset;
        if cfg.control_row == Some(row) {
            x -= m.control_row_shift;
        }

        for run in grid.runs(row) {
            let length = run.len_steps() as f64 * m.unit_per_step - m.hole_shrink;
            if length <= 0.0 {
                continue;
            }
            let radius = if length > m.long_note_threshold {
                m.bridge_rounding
            } else {
                m.note_height / 2.0
            };

            let parts = split_segments(
                length,
                m.long_note_threshold,
                m.bridge_width,
                m.min_first_segment,
            );

            let mut y = run.start_step as f64 * m.unit_per_step + m.leading_margin;
            for (i, part) in parts.iter().enumerate() {
                for _ in 0..passes {
                    holes.push(RoundedRect {
                        x,
                        y,
                        width: m.note_height,
                        height: *part,
                        radius,
                    });
                }
                y += part;
                if i + 1 < parts.len() {
                    y += m.bridge_width;
                }
            }
        }
    }

    debug!(
        total_width,
        total_height,
        cut_lines = cut_lines.len(),
        holes = holes.len(),
        "computed roll geometry"
    );

    RollGeometry { total_width, total_height, cut_lines, holes }
}

// ═══════════════════════════════════════════════════════════════════════
// Cut-guide dashes
// ═══════════════════════════════════════════════════════════════════════

/// One vertical guide line as dashes from 0 to `limit`, the last dash
/// clipped to the boundary.
fn dash_column(lines: &mut Vec<Line>, x: f64, limit: f64, m: &Metrics) {
    let mut y = 0.0;
    while y < limit {
        let end = (y + m.dash_length).min(limit);
        lines.push(Line { x1: x, y1: y, x2: x, y2: end });
        y = end + m.dash_gap;
    }
}

/// A horizontal dash row between the two guide positions.
fn dash_row(lines: &mut Vec<Line>, y: f64, from_x: f64, to_x: f64, m: &Metrics) {
    let mut x = from_x;
    while x <= to_x {
        let end = (x + m.dash_length).min(to_x);
        lines.push(Line { x1: x, y1: y, x2: end, y2: y });
        x = end + m.dash_gap;
    }
}
