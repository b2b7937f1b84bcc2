//! Scaled metrics — the configuration converted to drawing units.
//!
//! Every length the engine touches is converted here, in one place,
//! so no dimension can end up half-scaled. The unit-per-step factor
//! is derived from the grid: the shortest held note in the
//! performance renders at exactly `base_length_mm`.

use crate::config::RollConfig;

#[derive(Debug, Clone, Copy)]
pub(super) struct Metrics {
    /// Drawing units per grid step along the time axis
    pub(super) unit_per_step: f64,
    pub(super) note_height: f64,
    pub(super) vertical_gap: f64,
    pub(super) vertical_offset: f64,
    pub(super) control_row_shift: f64,
    pub(super) leading_margin: f64,
    pub(super) trailing_margin: f64,
    pub(super) long_note_threshold: f64,
    pub(super) bridge_width: f64,
    pub(super) bridge_rounding: f64,
    pub(super) min_first_segment: f64,
    pub(super) hole_shrink: f64,
    pub(super) guide_inset: f64,
    pub(super) guide_span: f64,
    pub(super) extra_width: f64,
    pub(super) dash_length: f64,
    pub(super) dash_gap: f64,
}

impl Metrics {
    pub(super) fn scale(cfg: &RollConfig, min_held_steps: usize) -> Self {
        let s = cfg.units_per_mm;
        Self {
            unit_per_step: cfg.base_length_mm * s / min_held_steps as f64,
            note_height: cfg.note_height_mm * s,
            vertical_gap: cfg.vertical_gap_mm * s,
            vertical_offset: cfg.vertical_offset_mm * s,
            control_row_shift: cfg.control_row_shift_mm * s,
            leading_margin: cfg.leading_margin_mm * s,
            trailing_margin: cfg.trailing_margin_mm * s,
            long_note_threshold: cfg.long_note_threshold_mm * s,
            bridge_width: cfg.bridge_width_mm * s,
            bridge_rounding: cfg.bridge_rounding_mm * s,
            min_first_segment: cfg.min_first_segment_mm * s,
            hole_shrink: cfg.hole_shrink_mm * s,
            guide_inset: cfg.guide_inset_mm * s,
            guide_span: cfg.guide_span_mm * s,
            extra_width: cfg.extra_width_mm * s,
            dash_length: cfg.dash_length_mm * s,
            dash_gap: cfg.dash_gap_mm * s,
        }
    }
}
