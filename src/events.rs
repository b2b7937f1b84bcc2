//! Event normalization — merges a Standard MIDI File's per-track
//! delta-time messages into one chronologically ordered, absolute-time
//! stream of note-on/note-off events.
//!
//! Timing inside an SMF is expressed in ticks; converting ticks to
//! wall-clock seconds needs the header's pulses-per-quarter plus any
//! tempo meta events. The [`TempoMap`] walks those changes piecewise,
//! so a tempo change mid-file shifts every later event correctly.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use tracing::debug;

use crate::error::RollError;
use crate::model::{EventKind, EventStream, NoteEvent};

/// Tempo assumed until the first tempo meta event: 500 000 µs per
/// quarter note (120 BPM).
const DEFAULT_US_PER_QUARTER: f64 = 500_000.0;

// ═══════════════════════════════════════════════════════════════════════
// Tempo map
// ═══════════════════════════════════════════════════════════════════════

/// Piecewise tick → seconds conversion for one SMF.
#[derive(Debug, Clone)]
pub struct TempoMap {
    timing: MapTiming,
}

#[derive(Debug, Clone)]
enum MapTiming {
    /// Metrical timing: ticks per quarter note plus the tempo changes
    /// `(absolute tick, µs per quarter)`, ordered by tick.
    Metrical {
        ticks_per_quarter: f64,
        changes: Vec<(u64, f64)>,
    },
    /// SMPTE timing: a fixed tick duration, tempo events irrelevant.
    Timecode { seconds_per_tick: f64 },
}

impl TempoMap {
    /// Collect the tempo changes of every track, ordered by absolute
    /// tick.
    pub fn from_smf(smf: &Smf) -> Self {
        let timing = match smf.header.timing {
            Timing::Metrical(tpq) => {
                let mut changes: Vec<(u64, f64)> = Vec::new();
                for track in &smf.tracks {
                    let mut abs_ticks: u64 = 0;
                    for event in track {
                        abs_ticks += u64::from(event.delta.as_int());
                        if let TrackEventKind::Meta(MetaMessage::Tempo(us)) = event.kind {
                            changes.push((abs_ticks, f64::from(us.as_int())));
                        }
                    }
                }
                changes.sort_by_key(|&(tick, _)| tick);
                MapTiming::Metrical {
                    ticks_per_quarter: f64::from(tpq.as_int()),
                    changes,
                }
            }
            Timing::Timecode(fps, subframe) => MapTiming::Timecode {
                seconds_per_tick: 1.0 / (f64::from(fps.as_f32()) * f64::from(subframe)),
            },
        };
        TempoMap { timing }
    }

    /// Convert an absolute tick to seconds, respecting every tempo
    /// change before it.
    pub fn seconds_at(&self, tick: u64) -> f64 {
        match &self.timing {
            MapTiming::Timecode { seconds_per_tick } => tick as f64 * seconds_per_tick,
            MapTiming::Metrical { ticks_per_quarter, changes } => {
                let mut seconds = 0.0;
                let mut prev_tick: u64 = 0;
                let mut us_per_quarter = DEFAULT_US_PER_QUARTER;

                for &(change_tick, us) in changes {
                    if tick <= change_tick {
                        break;
                    }
                    let span = (change_tick - prev_tick) as f64;
                    seconds += span * us_per_quarter / (ticks_per_quarter * 1_000_000.0);
                    prev_tick = change_tick;
                    us_per_quarter = us;
                }

                let span = tick.saturating_sub(prev_tick) as f64;
                seconds + span * us_per_quarter / (ticks_per_quarter * 1_000_000.0)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Normalization
// ═══════════════════════════════════════════════════════════════════════

/// Parse SMF bytes and normalize them into one event stream.
pub fn parse_midi(data: &[u8]) -> Result<EventStream, RollError> {
    let smf = Smf::parse(data)?;
    Ok(normalize(&smf))
}

/// Merge every track into one chronological note event stream.
///
/// Each track's running absolute tick is accumulated independently;
/// the combined list is then stably sorted by tick, so simultaneous
/// events keep their original per-track order. A note-on with
/// velocity 0 is an off event. The stream's duration is the timestamp
/// of the last event of any kind, notes or not.
#[tracing::instrument(skip_all)]
pub fn normalize(smf: &Smf) -> EventStream {
    let tempo = TempoMap::from_smf(smf);

    let mut raw: Vec<(u64, u8, EventKind)> = Vec::new();
    let mut last_tick: u64 = 0;

    for track in &smf.tracks {
        let mut abs_ticks: u64 = 0;
        for event in track {
            abs_ticks += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } => {
                        let kind = if vel.as_int() > 0 { EventKind::On } else { EventKind::Off };
                        raw.push((abs_ticks, key.as_int(), kind));
                    }
                    MidiMessage::NoteOff { key, .. } => {
                        raw.push((abs_ticks, key.as_int(), EventKind::Off));
                    }
                    _ => {}
                }
            }
        }
        last_tick = last_tick.max(abs_ticks);
    }

    raw.sort_by_key(|&(tick, _, _)| tick);

    let events: Vec<NoteEvent> = raw
        .into_iter()
        .map(|(tick, pitch, kind)| NoteEvent {
            time: tempo.seconds_at(tick),
            pitch,
            kind,
        })
        .collect();

    let duration_seconds = tempo.seconds_at(last_tick);
    debug!(
        events = events.len(),
        duration_seconds, "normalized event stream"
    );

    EventStream { events, duration_seconds }
}
