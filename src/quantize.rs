//! Quantizer — converts the normalized event stream into the binary
//! activity grid the layout engine consumes.
//!
//! Re-trigger policy is **last onset wins**: a note-on for a pitch
//! that is already active simply replaces the recorded start, and the
//! earlier partial hold is never written. Overlapping same-pitch notes
//! are a property of the input worth fixing there (the `overlap`
//! diagnostic finds them), not something this stage tries to repair.
//! A pitch still active when the stream ends writes nothing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ActivityGrid, EventKind, EventStream};

/// How MIDI pitches map to grid rows.
///
/// A fixed-stop instrument names its playable pitches explicitly; a
/// chromatic instrument covers a contiguous range. Pitches outside the
/// mapping are dropped silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PitchMapping {
    /// Contiguous inclusive range `lo..=hi`; row 0 is `lo`.
    Range { lo: u8, hi: u8 },
    /// Explicit ordered pitch list; row = position in the list.
    List(Vec<u8>),
}

impl PitchMapping {
    pub fn rows(&self) -> usize {
        match self {
            PitchMapping::Range { lo, hi } => (*hi as usize).saturating_sub(*lo as usize) + 1,
            PitchMapping::List(pitches) => pitches.len(),
        }
    }

    pub fn row_of(&self, pitch: u8) -> Option<usize> {
        match self {
            PitchMapping::Range { lo, hi } => {
                (*lo..=*hi).contains(&pitch).then(|| (pitch - lo) as usize)
            }
            PitchMapping::List(pitches) => pitches.iter().position(|&p| p == pitch),
        }
    }
}

/// Quantize the stream onto a grid of `time_step`-second columns.
///
/// Columns span `[0, duration / time_step)`. For each mapped pitch, a
/// note-on records `floor(time / time_step)` as the run start; the
/// matching note-off marks `[start, end)` held and records the
/// duration, dropping zero-length runs. The grid's `min_held_steps`
/// is the smallest recorded duration, defaulting to 1 when the
/// performance held no notes at all.
#[tracing::instrument(skip_all)]
pub fn quantize(stream: &EventStream, time_step: f64, mapping: &PitchMapping) -> ActivityGrid {
    let steps = (stream.duration_seconds / time_step) as usize;
    let mut grid = ActivityGrid::new(mapping.rows(), steps);

    // pitch → start step of the currently active hold
    let mut active: HashMap<u8, usize> = HashMap::new();
    let mut min_held: Option<usize> = None;

    for event in &stream.events {
        let step = (event.time / time_step) as usize;
        match event.kind {
            EventKind::On => {
                if mapping.row_of(event.pitch).is_some() {
                    active.insert(event.pitch, step);
                }
            }
            EventKind::Off => {
                let Some(start) = active.remove(&event.pitch) else {
                    continue;
                };
                if step == start {
                    continue;
                }
                if let Some(row) = mapping.row_of(event.pitch) {
                    grid.fill(row, start, step);
                    let held = step - start;
                    min_held = Some(min_held.map_or(held, |m| m.min(held)));
                }
            }
        }
    }

    grid.set_min_held_steps(min_held.unwrap_or(1));
    debug!(
        rows = grid.rows(),
        steps = grid.steps(),
        min_held_steps = grid.min_held_steps(),
        dropped_open = active.len(),
        "quantized activity grid"
    );
    grid
}
