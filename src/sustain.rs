//! Sustain-pedal synthesis — rewrites a MIDI file so every pedal span
//! also exists as a held note on a control pitch.
//!
//! Roll instruments have no pedal; the piano format instead reserves
//! one track-bar position (pitch 18, row 1) that the mechanism reads
//! as the sustain signal. This tool turns each CC 64 press/release
//! pair into a matching note-on/note-off on that pitch, leaving every
//! original message untouched, so the rewritten file quantizes like
//! any other note.

use std::fs;
use std::path::Path;

use midly::num::{u28, u4, u7};
use midly::{MetaMessage, MidiMessage, Smf, TrackEvent, TrackEventKind};
use tracing::debug;

use crate::error::RollError;

/// The control pitch the piano roll format reserves for the pedal.
pub const SUSTAIN_PITCH: u8 = 18;
/// MIDI controller number of the sustain pedal.
pub const SUSTAIN_CONTROLLER: u8 = 64;

/// Synthesize sustain notes into every track of a parsed file.
///
/// The header (format, timing) is preserved unchanged.
pub fn add_sustain_notes<'a>(smf: &Smf<'a>) -> Smf<'a> {
    let tracks = smf.tracks.iter().map(|t| synthesize_track(t)).collect();
    Smf { header: smf.header, tracks }
}

fn synthesize_track<'a>(track: &[TrackEvent<'a>]) -> Vec<TrackEvent<'a>> {
    // Work in absolute ticks; the end-of-track marker is stripped here
    // and re-appended after the sort so a span closed at the track's
    // final tick cannot land behind it.
    let mut events: Vec<(u64, TrackEventKind<'a>)> = Vec::new();
    let mut abs_ticks: u64 = 0;
    let mut pedal_down = false;

    for event in track {
        abs_ticks += u64::from(event.delta.as_int());
        if matches!(event.kind, TrackEventKind::Meta(MetaMessage::EndOfTrack)) {
            continue;
        }
        events.push((abs_ticks, event.kind));

        if let TrackEventKind::Midi {
            message: MidiMessage::Controller { controller, value },
            ..
        } = event.kind
        {
            if controller.as_int() == SUSTAIN_CONTROLLER {
                if value.as_int() > 0 && !pedal_down {
                    pedal_down = true;
                    events.push((abs_ticks, sustain_note(true)));
                } else if value.as_int() == 0 && pedal_down {
                    pedal_down = false;
                    events.push((abs_ticks, sustain_note(false)));
                }
            }
        }
    }

    // Pedal never released: close the span at the track's end
    if pedal_down {
        events.push((abs_ticks, sustain_note(false)));
    }

    events.sort_by_key(|&(tick, _)| tick);

    let mut rebuilt = Vec::with_capacity(events.len() + 1);
    let mut prev_tick: u64 = 0;
    for (tick, kind) in events {
        rebuilt.push(TrackEvent {
            delta: u28::new((tick - prev_tick) as u32),
            kind,
        });
        prev_tick = tick;
    }
    rebuilt.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    rebuilt
}

fn sustain_note(on: bool) -> TrackEventKind<'static> {
    let message = if on {
        MidiMessage::NoteOn { key: u7::new(SUSTAIN_PITCH), vel: u7::new(1) }
    } else {
        MidiMessage::NoteOff { key: u7::new(SUSTAIN_PITCH), vel: u7::new(1) }
    };
    TrackEventKind::Midi { channel: u4::new(0), message }
}

/// Read a MIDI file, synthesize sustain notes, and write the result.
///
/// `input` and `output` may be the same path (the usual mode: the
/// file is rewritten in place).
pub fn rewrite_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<(), RollError> {
    let input = input.as_ref();
    let output = output.as_ref();

    let data = fs::read(input).map_err(|e| RollError::Read {
        path: input.display().to_string(),
        source: e,
    })?;
    let smf = Smf::parse(&data)?;
    let rewritten = add_sustain_notes(&smf);

    let mut buf = Vec::new();
    rewritten
        .write_std(&mut buf)
        .map_err(|e| RollError::Write { path: output.display().to_string(), source: e })?;
    fs::write(output, buf).map_err(|e| RollError::Write {
        path: output.display().to_string(),
        source: e,
    })?;

    debug!(input = %input.display(), output = %output.display(), "sustain notes synthesized");
    Ok(())
}
