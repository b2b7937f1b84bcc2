//! Data model for the roll pipeline.
//!
//! These structures carry a performance from normalized note events
//! through the activity grid to the final cutting geometry.

use serde::{Deserialize, Serialize};

/// Whether a note event starts or ends a held note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    On,
    Off,
}

/// A single normalized note event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Absolute time in seconds from the start of the performance
    pub time: f64,
    /// MIDI note number (0–127)
    pub pitch: u8,
    pub kind: EventKind,
}

/// The normalizer's output: one chronological event list across all
/// tracks, plus the performance's total length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStream {
    /// Ordered by time; original per-track order preserved for ties
    pub events: Vec<NoteEvent>,
    /// Timestamp of the last event of any kind, in seconds
    pub duration_seconds: f64,
}

/// A maximal contiguous span of "note held" steps within one grid row.
///
/// The interval is half-open: `[start_step, end_step)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteRun {
    pub start_step: usize,
    pub end_step: usize,
}

impl NoteRun {
    /// Length of the run in steps.
    pub fn len_steps(&self) -> usize {
        self.end_step - self.start_step
    }
}

/// Binary note-activity matrix: rows are mapped pitches, columns are
/// fixed-width time steps.
///
/// Built once by the quantizer; read-only for the rest of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityGrid {
    rows: usize,
    steps: usize,
    cells: Vec<bool>,
    min_held_steps: usize,
}

impl ActivityGrid {
    pub(crate) fn new(rows: usize, steps: usize) -> Self {
        Self {
            rows,
            steps,
            cells: vec![false; rows * steps],
            min_held_steps: 1,
        }
    }

    /// Mark `[start, end)` of a row as held. The end is clamped to the
    /// column count; an empty or out-of-range span is a no-op.
    pub(crate) fn fill(&mut self, row: usize, start: usize, end: usize) {
        let end = end.min(self.steps);
        if row >= self.rows || start >= end {
            return;
        }
        let base = row * self.steps;
        for cell in &mut self.cells[base + start..base + end] {
            *cell = true;
        }
    }

    pub(crate) fn set_min_held_steps(&mut self, steps: usize) {
        self.min_held_steps = steps.max(1);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn held(&self, row: usize, step: usize) -> bool {
        self.cells[row * self.steps + step]
    }

    /// Smallest recorded held-note duration in steps. Always ≥ 1 (it
    /// is a scaling divisor); 1 when the performance held no notes.
    pub fn min_held_steps(&self) -> usize {
        self.min_held_steps
    }

    /// Extract the maximal runs of one row, ordered by start step.
    ///
    /// A run still open at the last column is captured, not truncated.
    pub fn runs(&self, row: usize) -> Vec<NoteRun> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;
        for step in 0..self.steps {
            match (self.held(row, step), start) {
                (true, None) => start = Some(step),
                (false, Some(s)) => {
                    runs.push(NoteRun { start_step: s, end_step: step });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(NoteRun { start_step: s, end_step: self.steps });
        }
        runs
    }
}

/// A straight line primitive in drawing units (one cut-guide dash).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A rounded-rectangle hole primitive in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner radius (applied to both axes)
    pub radius: f64,
}

/// The layout engine's output: sheet dimensions plus every primitive
/// in the natural frame (x from the left sheet edge, y from the top,
/// increasing with time).
///
/// The cutting mechanism reads the roll reversed, so the drawing is
/// reflected about the sheet's vertical centerline on the way out:
/// as a group transform in the SVG, or via [`RollGeometry::mirrored`]
/// for coordinate-level access.
#[derive(Debug, Clone, Serialize)]
pub struct RollGeometry {
    pub total_width: f64,
    pub total_height: f64,
    /// Guide dashes, in emission order: left, right, then optional
    /// top/bottom rows
    pub cut_lines: Vec<Line>,
    /// One entry per rendered hole; double-cut mode emits each hole
    /// twice at identical coordinates
    pub holes: Vec<RoundedRect>,
}

impl RollGeometry {
    /// The geometry as the cutter sees it: reflected about the
    /// vertical centerline (`x → total_width − x`).
    ///
    /// Applying this twice returns the original coordinates.
    pub fn mirrored(&self) -> RollGeometry {
        RollGeometry {
            total_width: self.total_width,
            total_height: self.total_height,
            cut_lines: self
                .cut_lines
                .iter()
                .map(|l| Line {
                    x1: self.total_width - l.x1,
                    y1: l.y1,
                    x2: self.total_width - l.x2,
                    y2: l.y2,
                })
                .collect(),
            holes: self
                .holes
                .iter()
                .map(|r| RoundedRect {
                    x: self.total_width - r.x - r.width,
                    ..*r
                })
                .collect(),
        }
    }
}
