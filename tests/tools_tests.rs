//! Integration tests for the sidecar tools (overlap diagnostic,
//! sustain synthesis) and the end-to-end bytes→SVG pipeline.

use pretty_assertions::assert_eq;

use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use rollcut::overlap::find_overlaps;
use rollcut::sustain::{add_sustain_notes, SUSTAIN_PITCH};
use rollcut::RollConfig;

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

fn note_on(delta: u32, pitch: u8, vel: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn { key: u7::new(pitch), vel: u7::new(vel) },
        },
    }
}

fn note_off(delta: u32, pitch: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOff { key: u7::new(pitch), vel: u7::new(0) },
        },
    }
}

fn pedal(delta: u32, value: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::Controller { controller: u7::new(64), value: u7::new(value) },
        },
    }
}

fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

fn smf(tracks: Vec<Vec<TrackEvent<'static>>>) -> Smf<'static> {
    Smf {
        header: Header {
            format: Format::Parallel,
            timing: Timing::Metrical(u15::new(480)),
        },
        tracks,
    }
}

/// Absolute-tick `(tick, is_on)` pairs of a track's sustain-pitch
/// note events.
fn sustain_events(track: &[TrackEvent]) -> Vec<(u64, bool)> {
    let mut abs: u64 = 0;
    let mut out = Vec::new();
    for event in track {
        abs += u64::from(event.delta.as_int());
        if let TrackEventKind::Midi { message, .. } = event.kind {
            match message {
                MidiMessage::NoteOn { key, .. } if key.as_int() == SUSTAIN_PITCH => {
                    out.push((abs, true));
                }
                MidiMessage::NoteOff { key, .. } if key.as_int() == SUSTAIN_PITCH => {
                    out.push((abs, false));
                }
                _ => {}
            }
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════
// Overlap diagnostic
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn clean_file_has_no_overlaps() {
    let smf = smf(vec![vec![
        note_on(0, 60, 80),
        note_off(480, 60),
        note_on(0, 60, 80),
        note_off(480, 60),
        end_of_track(),
    ]]);
    assert!(find_overlaps(&smf).is_empty());
}

#[test]
fn retrigger_while_held_is_reported() {
    let smf = smf(vec![vec![
        note_on(0, 60, 80),
        note_on(480, 60, 80), // 60 is still sounding
        note_off(480, 60),
        note_off(0, 60),
        end_of_track(),
    ]]);
    let overlaps = find_overlaps(&smf);
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].tick, 480);
    assert_eq!(overlaps[0].pitch, 60);
    assert_eq!(overlaps[0].name, "C4");
    // 480 ticks at the default tempo
    assert!((overlaps[0].seconds - 0.5).abs() < 1e-9);
}

#[test]
fn overlap_across_tracks_is_detected() {
    let smf = smf(vec![
        vec![note_on(0, 72, 80), note_off(960, 72), end_of_track()],
        vec![note_on(480, 72, 80), note_off(960, 72), end_of_track()],
    ]);
    let overlaps = find_overlaps(&smf);
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].tick, 480);
    assert_eq!(overlaps[0].name, "C5");
}

#[test]
fn velocity_zero_on_releases_the_pitch() {
    let smf = smf(vec![vec![
        note_on(0, 60, 80),
        note_on(480, 60, 0), // release, not a retrigger
        note_on(0, 60, 80),
        note_off(480, 60),
        end_of_track(),
    ]]);
    assert!(find_overlaps(&smf).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Sustain synthesis
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn pedal_span_becomes_a_control_note() {
    let smf = smf(vec![vec![
        pedal(0, 100),
        note_on(480, 60, 80),
        pedal(480, 0),
        end_of_track(),
    ]]);
    let rewritten = add_sustain_notes(&smf);

    assert_eq!(rewritten.tracks.len(), 1);
    assert_eq!(sustain_events(&rewritten.tracks[0]), vec![(0, true), (960, false)]);
    // original messages all survive: 3 + 2 synthesized + end-of-track
    assert_eq!(rewritten.tracks[0].len(), 6);
    assert!(matches!(
        rewritten.tracks[0].last().unwrap().kind,
        TrackEventKind::Meta(MetaMessage::EndOfTrack)
    ));
}

#[test]
fn unreleased_pedal_closes_at_track_end() {
    let smf = smf(vec![vec![
        pedal(0, 64),
        note_on(480, 60, 80),
        end_of_track(),
    ]]);
    let rewritten = add_sustain_notes(&smf);
    assert_eq!(sustain_events(&rewritten.tracks[0]), vec![(0, true), (480, false)]);
}

#[test]
fn repeated_press_while_down_synthesizes_one_note() {
    let smf = smf(vec![vec![
        pedal(0, 100),
        pedal(100, 50), // still down, no new note
        pedal(100, 0),
        end_of_track(),
    ]]);
    let rewritten = add_sustain_notes(&smf);
    assert_eq!(sustain_events(&rewritten.tracks[0]), vec![(0, true), (200, false)]);
}

#[test]
fn tracks_without_pedal_are_preserved() {
    let original = vec![
        note_on(0, 60, 80),
        note_off(480, 60),
        end_of_track(),
    ];
    let rewritten = add_sustain_notes(&smf(vec![original.clone()]));
    assert_eq!(rewritten.tracks[0], original);
}

#[test]
fn rewritten_file_round_trips_through_the_writer() {
    let smf = smf(vec![vec![
        pedal(0, 100),
        note_on(480, 60, 80),
        note_off(480, 60),
        pedal(0, 0),
        end_of_track(),
    ]]);
    let rewritten = add_sustain_notes(&smf);

    let mut bytes = Vec::new();
    rewritten.write_std(&mut bytes).unwrap();
    let reparsed = Smf::parse(&bytes).unwrap();

    assert_eq!(reparsed.tracks.len(), rewritten.tracks.len());
    assert_eq!(
        sustain_events(&reparsed.tracks[0]),
        sustain_events(&rewritten.tracks[0])
    );
}

// ═══════════════════════════════════════════════════════════════════════
// End-to-end pipeline
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn bytes_to_svg_renders_holes_and_guides() {
    let smf = smf(vec![vec![
        note_on(0, 60, 80), // pitch 60 is on the organ's stop list
        note_off(960, 60),
        end_of_track(),
    ]]);
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).unwrap();

    let svg = rollcut::roll_bytes_to_svg(&bytes, &RollConfig::organ()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("scale(-1,1)"));
    // organ preset double-cuts: the one note appears as two rects
    assert_eq!(svg.matches("<rect").count(), 2);
    assert!(svg.matches("<line").count() > 0);
}

#[test]
fn malformed_bytes_fail_with_a_midi_error() {
    let err = rollcut::roll_bytes_to_svg(b"not a midi file", &RollConfig::organ()).unwrap_err();
    assert!(matches!(err, rollcut::RollError::Midi(_)));
}
