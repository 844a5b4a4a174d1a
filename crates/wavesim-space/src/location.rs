//! Resolution of per-axis coordinates to grid indices.

use wavesim_core::Coordinate;

/// Resolves a per-axis location to grid indices, clamping fixed
/// coordinates into range and leaving wildcard axes unconstrained.
///
/// Mirrors the semantics used by [`crate::detector::Detector`] and by
/// source placement: a `Fixed` coordinate maps to the nearest interior
/// index (clamped to `[0, shape[i]-1]`); an `Any` coordinate is left
/// unconstrained and the caller broadcasts along that axis.
///
/// Coordinates beyond the grid's dimensionality are ignored: only the
/// first `shape.len()` entries of `location` are consulted.
pub fn location_to_index(location: &[Coordinate], spacing: f64, shape: &[usize]) -> Vec<Option<usize>> {
    shape
        .iter()
        .enumerate()
        .map(|(axis, &len)| {
            location
                .get(axis)
                .copied()
                .unwrap_or(Coordinate::Any)
                .resolve_index(spacing, len)
        })
        .collect()
}
