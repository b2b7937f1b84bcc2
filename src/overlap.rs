//! Overlap diagnostic — flags note-ons that arrive while the same
//! pitch is already sounding.
//!
//! The quantizer's last-onset-wins policy silently shortens such
//! notes, so roll authors run this first and fix the performance
//! rather than the output. This tool is a plain scan over the merged
//! event list; it shares the quantizer's event-stream format but is
//! not part of the geometry engine.

use midly::{MidiMessage, Smf, TrackEventKind};

use crate::events::TempoMap;

/// One doubled note-on, with everything needed to find it in an
/// editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    /// Absolute tick of the offending note-on
    pub tick: u64,
    /// Same instant in wall-clock seconds
    pub seconds: f64,
    pub pitch: u8,
    /// Human-readable note name, e.g. "F#3"
    pub name: String,
}

/// Scan a parsed MIDI file for overlapping same-pitch notes.
///
/// All tracks are merged by absolute tick (stable, per-track order
/// kept on ties); a per-pitch active count is incremented on note-on
/// and decremented on note-off (or velocity-0 note-on). Every note-on
/// that raises the count above one is reported.
pub fn find_overlaps(smf: &Smf) -> Vec<Overlap> {
    let tempo = TempoMap::from_smf(smf);

    let mut merged: Vec<(u64, u8, bool)> = Vec::new();
    for track in &smf.tracks {
        let mut abs_ticks: u64 = 0;
        for event in track {
            abs_ticks += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } => {
                        merged.push((abs_ticks, key.as_int(), vel.as_int() > 0));
                    }
                    MidiMessage::NoteOff { key, .. } => {
                        merged.push((abs_ticks, key.as_int(), false));
                    }
                    _ => {}
                }
            }
        }
    }
    merged.sort_by_key(|&(tick, _, _)| tick);

    let mut active = [0i32; 128];
    let mut overlaps = Vec::new();
    for (tick, pitch, is_on) in merged {
        let slot = &mut active[pitch as usize];
        if is_on {
            *slot += 1;
            if *slot > 1 {
                overlaps.push(Overlap {
                    tick,
                    seconds: tempo.seconds_at(tick),
                    pitch,
                    name: note_name(pitch),
                });
            }
        } else {
            *slot -= 1;
        }
    }
    overlaps
}

/// Note name for a MIDI pitch, middle C (60) = "C4".
pub fn note_name(pitch: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = i32::from(pitch / 12) - 1;
    format!("{}{}", NAMES[usize::from(pitch % 12)], octave)
}
