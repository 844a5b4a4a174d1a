//! Sinusoidal driving source with a spatial weight pattern.

use ndarray::{ArrayD, IxDyn};
use std::f64::consts::PI;
use wavesim_core::Coordinate;
use wavesim_space::location_to_index;

/// A sinusoidal source with a point/line/plane spatial weight and
/// optional finite-cycle gating.
///
/// The spatial weight is resolved once at construction from a per-axis
/// [`Coordinate`]: a `Fixed` axis collapses the weight to the nearest
/// interior index (clamped into range); an `Any` axis broadcasts across
/// the full axis. Because the clamped index always lands inside the
/// grid, `weight` always has at least one nonzero entry.
#[derive(Clone, Debug)]
pub struct Source {
    weight: ArrayD<f64>,
    period: f64,
    ncycles: Option<f64>,
    phase: f64,
}

/// Builder for [`Source`].
///
/// Required fields: `grid_shape`, `spacing`, `location`, and `period`.
pub struct SourceBuilder {
    grid_shape: Option<Vec<usize>>,
    spacing: f64,
    location: Vec<Coordinate>,
    period: Option<f64>,
    ncycles: Option<f64>,
    phase: f64,
}

impl Source {
    /// Create a new builder for configuring a `Source`.
    pub fn builder() -> SourceBuilder {
        SourceBuilder {
            grid_shape: None,
            spacing: 1.0,
            location: Vec::new(),
            period: None,
            ncycles: None,
            phase: 0.0,
        }
    }

    /// Spatial weight pattern, shaped like the grid's interior.
    pub fn weight(&self) -> &ArrayD<f64> {
        &self.weight
    }

    /// `sin(2*pi*t/period + phase)`, gated to zero once `t/period` exceeds
    /// `ncycles` (when finite).
    pub fn profile(&self, t: f64) -> f64 {
        if let Some(ncycles) = self.ncycles {
            if t / self.period > ncycles {
                return 0.0;
            }
        }
        (2.0 * PI * t / self.period + self.phase).sin()
    }

    /// `weight * profile(t)`, shaped like the grid's interior.
    pub fn value(&self, t: f64) -> ArrayD<f64> {
        &self.weight * self.profile(t)
    }
}

impl SourceBuilder {
    /// Set the interior grid shape the weight pattern is defined over.
    pub fn grid_shape(mut self, shape: Vec<usize>) -> Self {
        self.grid_shape = Some(shape);
        self
    }

    /// Set the grid spacing used to resolve fixed coordinates to indices
    /// (default: 1.0).
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the per-axis location. Missing trailing axes default to
    /// [`Coordinate::Any`].
    pub fn location(mut self, location: Vec<Coordinate>) -> Self {
        self.location = location;
        self
    }

    /// Set the temporal period. Must be > 0.
    pub fn period(mut self, period: f64) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the finite-cycle gate (default: unbounded).
    pub fn ncycles(mut self, ncycles: Option<f64>) -> Self {
        self.ncycles = ncycles;
        self
    }

    /// Set the phase offset in radians (default: 0.0).
    pub fn phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Build the source, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `grid_shape` is not set or has zero dimensions
    /// - `period` is not set, not > 0, or is NaN
    pub fn build(self) -> Result<Source, String> {
        let grid_shape = self
            .grid_shape
            .ok_or_else(|| "grid_shape is required".to_string())?;
        if grid_shape.is_empty() {
            return Err("grid_shape must have at least one axis".to_string());
        }
        let period = self.period.ok_or_else(|| "period is required".to_string())?;
        if !(period > 0.0) {
            return Err(format!("period must be finite and > 0, got {period}"));
        }

        let resolved = location_to_index(&self.location, self.spacing, &grid_shape);
        let weight = ArrayD::from_shape_fn(IxDyn(&grid_shape), |idx| {
            let matches = idx
                .slice()
                .iter()
                .enumerate()
                .all(|(axis, &i)| resolved[axis].is_none_or(|fixed| fixed == i));
            if matches {
                1.0
            } else {
                0.0
            }
        });

        Ok(Source {
            weight,
            period,
            ncycles: self.ncycles,
            phase: self.phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_missing_grid_shape() {
        let result = Source::builder().period(1.0).build();
        assert!(result.unwrap_err().contains("grid_shape"));
    }

    #[test]
    fn builder_rejects_missing_period() {
        let result = Source::builder().grid_shape(vec![4]).build();
        assert!(result.unwrap_err().contains("period"));
    }

    #[test]
    fn builder_rejects_non_positive_period() {
        let result = Source::builder()
            .grid_shape(vec![4])
            .period(0.0)
            .build();
        assert!(result.unwrap_err().contains("period"));
    }

    #[test]
    fn fixed_point_source_weight_is_one_hot() {
        let source = Source::builder()
            .grid_shape(vec![10])
            .spacing(1.0)
            .location(vec![Coordinate::Fixed(3.0)])
            .period(1.0)
            .build()
            .unwrap();
        let weight = source.weight();
        assert_eq!(weight.sum(), 1.0);
        assert_eq!(weight[IxDyn(&[3])], 1.0);
    }

    #[test]
    fn wildcard_axis_broadcasts() {
        let source = Source::builder()
            .grid_shape(vec![4, 5])
            .location(vec![Coordinate::Fixed(2.0), Coordinate::Any])
            .period(1.0)
            .build()
            .unwrap();
        assert_eq!(source.weight().sum(), 5.0);
    }

    #[test]
    fn profile_at_zero_is_zero() {
        let source = Source::builder()
            .grid_shape(vec![4])
            .period(5e-6)
            .build()
            .unwrap();
        assert!(source.profile(0.0).abs() < 1e-12);
    }

    #[test]
    fn profile_at_quarter_period_is_one() {
        let source = Source::builder()
            .grid_shape(vec![4])
            .period(5e-6)
            .build()
            .unwrap();
        assert!((source.profile(5e-6 / 4.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ncycles_gates_to_zero() {
        let source = Source::builder()
            .grid_shape(vec![4])
            .period(1.0)
            .ncycles(Some(2.0))
            .build()
            .unwrap();
        assert_eq!(source.profile(2.5), 0.0);
        assert_ne!(source.profile(1.25), 0.0);
    }
}
