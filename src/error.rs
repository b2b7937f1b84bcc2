//! Error taxonomy for the roll pipeline.
//!
//! Geometry computation itself is total. Only the pipeline's
//! boundaries (file read, MIDI parse, file write, debug serialization)
//! can fail, and each failure names its stage so a parse error is
//! never mistaken for an output error.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollError {
    /// The input file could not be read.
    #[error("failed to read '{path}': {source}")]
    Read { path: String, source: io::Error },

    /// The input bytes are not a well-formed Standard MIDI File.
    #[error("invalid MIDI data: {0}")]
    Midi(#[from] midly::Error),

    /// The output file could not be written.
    #[error("failed to write '{path}': {source}")]
    Write { path: String, source: io::Error },

    /// A debug/inspection dump failed to serialize.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
