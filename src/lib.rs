//! rollcut — converts a MIDI performance into cutting geometry for a
//! player-instrument paper/mylar roll.
//!
//! The pipeline is a batch of pure stages: normalize the file's
//! per-track events into one chronological stream, quantize it onto a
//! binary activity grid, lay the grid out as vector geometry (holes,
//! bridges, cut-guide dashes), and emit the result as SVG for a
//! cutting machine.
//!
//! # Example
//! ```no_run
//! use rollcut::{roll_file_to_svg, RollConfig};
//!
//! let svg = roll_file_to_svg("performance.mid", &RollConfig::organ()).unwrap();
//! std::fs::write("performance.svg", svg).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod layout;
pub mod model;
pub mod overlap;
pub mod quantize;
pub mod sustain;
pub mod svg;

use std::path::Path;

pub use config::RollConfig;
pub use error::RollError;
pub use events::parse_midi;
pub use layout::layout_roll;
pub use model::{ActivityGrid, EventStream, NoteEvent, RollGeometry};
pub use quantize::{quantize, PitchMapping};
pub use svg::render_svg;

/// Run the whole pipeline on SMF bytes, up to the geometry.
pub fn roll_bytes_to_geometry(data: &[u8], cfg: &RollConfig) -> Result<RollGeometry, RollError> {
    let stream = events::parse_midi(data)?;
    let grid = quantize::quantize(&stream, cfg.time_step_s, &cfg.mapping);
    Ok(layout::layout_roll(&grid, cfg))
}

/// Run the whole pipeline on SMF bytes and render the SVG document.
pub fn roll_bytes_to_svg(data: &[u8], cfg: &RollConfig) -> Result<String, RollError> {
    Ok(svg::render_svg(&roll_bytes_to_geometry(data, cfg)?))
}

/// Convenience wrapper: read a MIDI file and render its roll SVG.
pub fn roll_file_to_svg<P: AsRef<Path>>(path: P, cfg: &RollConfig) -> Result<String, RollError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| RollError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    roll_bytes_to_svg(&data, cfg)
}

/// Dump a geometry as pretty JSON, in cutter-frame coordinates.
/// Useful for inspecting exact hole positions without an SVG viewer.
pub fn geometry_to_json(geometry: &RollGeometry) -> Result<String, RollError> {
    Ok(serde_json::to_string_pretty(&geometry.mirrored())?)
}
