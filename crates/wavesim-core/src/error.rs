//! Error types for the wavesim simulation engine.
//!
//! One enum per subsystem, each implementing [`std::error::Error`] and
//! [`std::fmt::Display`] by hand.

use std::error::Error;
use std::fmt;

/// Errors raised while constructing or validating a [`crate::Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// `ndim` was not 1, 2, or 3.
    UnsupportedDimensionality {
        /// The rejected dimensionality.
        ndim: usize,
    },
    /// One of the `size` entries was zero.
    EmptyAxis {
        /// Index of the zero-length axis.
        axis: usize,
    },
    /// `spacing` was not strictly positive.
    NonPositiveSpacing,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDimensionality { ndim } => {
                write!(f, "grid dimensionality {ndim} is not in 1..=3")
            }
            Self::EmptyAxis { axis } => write!(f, "axis {axis} has zero length"),
            Self::NonPositiveSpacing => write!(f, "grid spacing must be positive"),
        }
    }
}

impl Error for GridError {}

/// Errors raised while constructing or validating a [`crate::Time`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeError {
    /// `step` was not strictly positive.
    NonPositiveStep,
    /// `duration` was not strictly positive.
    NonPositiveDuration,
    /// `temporal_downsample` was zero.
    ZeroDownsample,
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveStep => write!(f, "time step must be positive"),
            Self::NonPositiveDuration => write!(f, "duration must be positive"),
            Self::ZeroDownsample => write!(f, "temporal_downsample must be at least 1"),
        }
    }
}

impl Error for TimeError {}

/// Errors raised while constructing a `Detector`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectorError {
    /// Full-boundary sampling was requested on a grid whose axes are not
    /// all equal in length.
    GeometryMismatch {
        /// The mismatched per-axis sizes.
        shape: Vec<usize>,
    },
    /// `downsample` contained a zero stride.
    ZeroStride {
        /// Index of the offending axis.
        axis: usize,
    },
    /// `downsample`'s rank did not match the grid's dimensionality.
    RankMismatch {
        /// Grid dimensionality.
        ndim: usize,
        /// Downsample vector length.
        got: usize,
    },
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeometryMismatch { shape } => {
                write!(f, "full-boundary detection requires a cubic grid, got {shape:?}")
            }
            Self::ZeroStride { axis } => write!(f, "downsample stride on axis {axis} is zero"),
            Self::RankMismatch { ndim, got } => {
                write!(f, "downsample rank {got} does not match grid dimensionality {ndim}")
            }
        }
    }
}

impl Error for DetectorError {}

/// Errors raised while generating or validating a speed field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeedError {
    /// An array passed to `SpeedField::from_array` had a shape that
    /// did not match the grid's interior shape.
    ShapeMismatch {
        /// Expected interior shape.
        expected: Vec<usize>,
        /// Shape actually supplied.
        got: Vec<usize>,
    },
    /// `min_speed` was not strictly less than `max_speed`.
    InvalidRange {
        /// Lower bound supplied.
        min_speed: f64,
        /// Upper bound supplied.
        max_speed: f64,
    },
}

impl fmt::Display for SpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, got } => {
                write!(f, "speed field shape {got:?} does not match grid interior shape {expected:?}")
            }
            Self::InvalidRange { min_speed, max_speed } => {
                write!(f, "min_speed {min_speed} must be less than max_speed {max_speed}")
            }
        }
    }
}

impl Error for SpeedError {}

/// Errors raised when dispatching a named speed sampler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SamplerError {
    /// The named sampling method is not one of the closed set of
    /// supported generators.
    UnknownSampler {
        /// The unrecognized name.
        name: String,
    },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSampler { name } => write!(f, "unknown speed sampler '{name}'"),
        }
    }
}

impl Error for SamplerError {}

/// Errors raised while constructing a `Simulation`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The requested (or derived) time step exceeds the Courant stability
    /// limit for the grid's spacing and the medium's max speed.
    StabilityViolation {
        /// Time step that was requested.
        requested_step: f64,
        /// Largest stable time step for the given grid and speed.
        max_stable_step: f64,
    },
    /// The grid was rejected by [`super::GridError`].
    Grid(GridError),
    /// The time configuration was rejected by [`super::TimeError`].
    Time(TimeError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StabilityViolation { requested_step, max_stable_step } => write!(
                f,
                "time step {requested_step} exceeds the stable limit {max_stable_step}"
            ),
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
            Self::Time(e) => write!(f, "invalid time configuration: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Time(e) => Some(e),
            Self::StabilityViolation { .. } => None,
        }
    }
}

/// Errors raised while running a simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum RunError {
    /// `run` was called with no source attached.
    MissingSource,
    /// `run` was called with no detector attached.
    MissingDetector,
    /// The supplied `duration` / `temporal_downsample` were rejected by
    /// [`TimeError`].
    Time(TimeError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource => write!(f, "simulation has no source attached"),
            Self::MissingDetector => write!(f, "simulation has no detector attached"),
            Self::Time(e) => write!(f, "invalid run time configuration: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Time(e) => Some(e),
            _ => None,
        }
    }
}
