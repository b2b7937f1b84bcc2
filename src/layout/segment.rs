//! Long-note segmentation — the bridging policy that keeps the roll
//! structurally sound.
//!
//! An uncut slot longer than the threshold would leave the material
//! between two rows hanging on nothing, so a long hole is cut as a
//! series of segments with a narrow bridge of uncut material between
//! them. Each join consumes exactly one bridge width and adds no
//! length: `sum(segments) + (count − 1) * bridge == length`.

/// Split a hole of physical `length` into segment lengths, earliest
/// first.
///
/// Full-length segments of `threshold` are peeled off the far end
/// while more than `threshold + bridge` remains; the remainder becomes
/// the first (earliest-in-time) segment. A remainder shorter than
/// `min_first` is not emitted as a stub: it merges into the adjacent
/// peeled segment, which absorbs the remainder plus the bridge that
/// would have separated them.
pub fn split_segments(length: f64, threshold: f64, bridge: f64, min_first: f64) -> Vec<f64> {
    if length <= threshold {
        return vec![length];
    }

    let mut parts: Vec<f64> = Vec::new();
    let mut remainder = length;
    while remainder > threshold + bridge {
        parts.push(threshold);
        remainder -= threshold + bridge;
    }

    if remainder < min_first {
        if let Some(first) = parts.first_mut() {
            *first += remainder + bridge;
        } else {
            parts.push(remainder);
        }
    } else {
        parts.insert(0, remainder);
    }

    parts
}
