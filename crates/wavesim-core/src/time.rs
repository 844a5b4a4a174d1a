//! Immutable temporal descriptor for a simulation run.

use crate::error::TimeError;

/// Immutable temporal descriptor: a step size, a total duration, and a
/// temporal downsampling factor for the detected-output cadence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Time {
    step: f64,
    duration: f64,
    temporal_downsample: usize,
    nsteps: usize,
    nsteps_detected: usize,
}

impl Time {
    /// Builds a `Time` descriptor, deriving the step count and the
    /// detected-step count.
    pub fn new(step: f64, duration: f64, temporal_downsample: usize) -> Result<Self, TimeError> {
        if step <= 0.0 {
            return Err(TimeError::NonPositiveStep);
        }
        if duration <= 0.0 {
            return Err(TimeError::NonPositiveDuration);
        }
        if temporal_downsample == 0 {
            return Err(TimeError::ZeroDownsample);
        }
        let nsteps = (duration / step).floor() as usize;
        let nsteps_detected = (nsteps.saturating_sub(1)) / temporal_downsample + 1;
        Ok(Time {
            step,
            duration,
            temporal_downsample,
            nsteps,
            nsteps_detected,
        })
    }

    /// Per-step time increment.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Total simulated duration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Stride, in steps, between recorded samples.
    pub fn temporal_downsample(&self) -> usize {
        self.temporal_downsample
    }

    /// `floor(duration / step)`.
    pub fn nsteps(&self) -> usize {
        self.nsteps
    }

    /// Number of samples that will be written to the detected buffers.
    pub fn nsteps_detected(&self) -> usize {
        self.nsteps_detected
    }

    /// The simulated time at each step, `0, step, 2*step, ...`.
    pub fn values(&self) -> Vec<f64> {
        (0..self.nsteps).map(|i| i as f64 * self.step).collect()
    }
}
