//! Roll configuration — every physical and layout constant of one
//! instrument's roll format, gathered in a single immutable value.
//!
//! All lengths are millimeters of real material; the engine multiplies
//! them by `units_per_mm` exactly once, so the printed sheet matches
//! physical measurements.

use serde::{Deserialize, Serialize};

use crate::quantize::PitchMapping;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollConfig {
    /// Quantization step in seconds
    pub time_step_s: f64,
    /// Which MIDI pitches become grid rows
    pub mapping: PitchMapping,

    /// Rendered length of the shortest held note
    pub base_length_mm: f64,
    /// Hole width across the roll
    pub note_height_mm: f64,
    /// Gap between adjacent note rows
    pub vertical_gap_mm: f64,
    /// Cross-axis offset of the note band within the guide lines
    pub vertical_offset_mm: f64,
    /// Row carrying a non-pitch control signal (e.g. the sustain
    /// pedal), if any
    pub control_row: Option<usize>,
    /// Inward shift of the control row toward its neighbor
    pub control_row_shift_mm: f64,

    /// Blank roll before the first note
    pub leading_margin_mm: f64,
    /// Blank roll after the last note
    pub trailing_margin_mm: f64,

    /// Hole length above which a note is split into bridged segments
    pub long_note_threshold_mm: f64,
    /// Uncut material left between segments of one note
    pub bridge_width_mm: f64,
    /// Corner radius for the segments of a split note
    pub bridge_rounding_mm: f64,
    /// Shortest first segment allowed before it merges into the next
    pub min_first_segment_mm: f64,
    /// Fixed length removed from every hole before segmentation
    pub hole_shrink_mm: f64,

    /// Cut every hole twice for a clean edge
    pub double_cut: bool,

    /// Dash top and bottom edges as well as the long sides
    pub horizontal_guides: bool,
    /// Left guide line's distance from the sheet edge
    pub guide_inset_mm: f64,
    /// Distance between the two guide lines (the physical roll width)
    pub guide_span_mm: f64,
    /// Extra sheet beyond the guide span
    pub extra_width_mm: f64,
    /// Guide dash length
    pub dash_length_mm: f64,
    /// Gap between guide dashes
    pub dash_gap_mm: f64,

    /// Drawing units per millimeter of material
    pub units_per_mm: f64,
}

impl RollConfig {
    /// 24-stop street organ roll: fixed pitch list, 3 mm holes on a
    /// 110 mm roll, every hole shortened 2 mm for the tracker bar.
    pub fn organ() -> Self {
        Self {
            time_step_s: 0.01,
            mapping: PitchMapping::List(vec![
                41, 46, 48, 50, 51, 52, 53, 55, 57, 58, 60, 62, 63, 64, 65, 67, 69, 70, 72, 74,
                77, 78, 79, 80,
            ]),
            base_length_mm: 5.0,
            note_height_mm: 3.0,
            vertical_gap_mm: 0.85,
            vertical_offset_mm: 8.43,
            control_row: None,
            control_row_shift_mm: 0.0,
            leading_margin_mm: 110.0,
            trailing_margin_mm: 110.0,
            long_note_threshold_mm: 10.0,
            bridge_width_mm: 1.0,
            // Same full rounding as an unsplit hole
            bridge_rounding_mm: 1.5,
            min_first_segment_mm: 3.0,
            hole_shrink_mm: 2.0,
            double_cut: true,
            horizontal_guides: true,
            guide_inset_mm: 5.0,
            guide_span_mm: 110.0,
            extra_width_mm: 10.0,
            dash_length_mm: 15.0,
            dash_gap_mm: 0.3,
            units_per_mm: 2.82,
        }
    }

    /// Player piano roll: chromatic range 17–110 on a 286 mm roll,
    /// with the sustain pedal synthesized onto pitch 18 (row 1) and
    /// nudged toward its neighbor.
    pub fn piano() -> Self {
        Self {
            time_step_s: 0.01,
            mapping: PitchMapping::Range { lo: 17, hi: 110 },
            base_length_mm: 2.1,
            note_height_mm: 1.91,
            vertical_gap_mm: 0.917,
            vertical_offset_mm: 7.75,
            control_row: Some(1),
            control_row_shift_mm: 1.91 / 2.0,
            leading_margin_mm: 75.0,
            trailing_margin_mm: 200.0,
            long_note_threshold_mm: 20.0,
            bridge_width_mm: 0.55,
            bridge_rounding_mm: 1.75,
            min_first_segment_mm: 3.0,
            hole_shrink_mm: 0.0,
            double_cut: true,
            horizontal_guides: true,
            guide_inset_mm: 5.0,
            guide_span_mm: 286.8,
            extra_width_mm: 10.0,
            dash_length_mm: 15.0,
            dash_gap_mm: 0.3,
            units_per_mm: 2.82,
        }
    }
}

impl Default for RollConfig {
    fn default() -> Self {
        RollConfig::organ()
    }
}
