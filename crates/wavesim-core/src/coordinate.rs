//! Per-axis coordinate specification for sources and detectors.

/// A single axis coordinate: either a fixed physical location, or a
/// wildcard meaning "every index along this axis".
///
/// Distinguishing these with a tagged union, rather than a sentinel value
/// such as `NaN` or `-1`, keeps "no constraint on this axis" from being
/// confused with an actual zero or negative coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coordinate {
    /// A fixed physical-space location along this axis, in the same units
    /// as [`crate::Grid::spacing`].
    Fixed(f64),
    /// No constraint: every index along this axis is included.
    Any,
}

impl Coordinate {
    /// Resolves this coordinate to a grid index along an axis of the
    /// given length, clamping fixed locations to the valid index range.
    ///
    /// Fixed locations truncate towards the lower grid line (`floor(loc /
    /// spacing)`), matching `int(loc // spacing)` in the reference this
    /// was derived from — not the nearest grid line.
    ///
    /// Returns `None` for [`Coordinate::Any`] — callers iterate the full
    /// axis range in that case.
    pub fn resolve_index(&self, spacing: f64, axis_len: usize) -> Option<usize> {
        match self {
            Coordinate::Any => None,
            Coordinate::Fixed(loc) => {
                let raw = (loc / spacing).floor();
                let max_index = axis_len.saturating_sub(1) as f64;
                Some(raw.clamp(0.0, max_index) as usize)
            }
        }
    }
}
