//! One-shot entry points for single-source and multi-source runs.

use std::error::Error;
use std::fmt;

use ndarray::{ArrayD, Axis};
use rand_chacha::ChaCha8Rng;
use wavesim_core::{ConfigError, Coordinate, DetectorError, RunError, SpeedError};
use wavesim_propagator::{sample_speed, SamplerKind, SpeedInput};

use crate::simulation::Simulation;

/// Where the interior speed field for a convenience run comes from:
/// either a named procedural generator, or a caller-supplied value.
#[derive(Clone, Debug)]
pub enum SpeedSpec {
    /// Generate via one of the closed-set samplers.
    Sampler(SamplerKind),
    /// Use this array or scalar directly.
    Input(SpeedInput),
}

/// A single source's placement and temporal profile, for
/// [`run_multiple_sources`].
#[derive(Clone, Debug)]
pub struct SourceSpec {
    /// Per-axis location.
    pub location: Vec<Coordinate>,
    /// Temporal period.
    pub period: f64,
    /// Finite-cycle gate.
    pub ncycles: Option<f64>,
    /// Phase offset in radians.
    pub phase: f64,
}

/// Errors raised by [`run_single_source`] / [`run_multiple_sources`],
/// wrapping whichever subsystem rejected the configuration.
#[derive(Clone, Debug)]
pub enum RunnerError {
    /// Grid/time-step construction failed.
    Config(ConfigError),
    /// Speed field construction failed.
    Speed(SpeedError),
    /// Source construction failed.
    Source(String),
    /// Detector construction failed.
    Detector(DetectorError),
    /// The run itself failed.
    Run(RunError),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Speed(e) => write!(f, "{e}"),
            Self::Source(e) => write!(f, "{e}"),
            Self::Detector(e) => write!(f, "{e}"),
            Self::Run(e) => write!(f, "{e}"),
        }
    }
}

impl Error for RunnerError {}

impl From<ConfigError> for RunnerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
impl From<SpeedError> for RunnerError {
    fn from(e: SpeedError) -> Self {
        Self::Speed(e)
    }
}
impl From<DetectorError> for RunnerError {
    fn from(e: DetectorError) -> Self {
        Self::Detector(e)
    }
}
impl From<RunError> for RunnerError {
    fn from(e: RunError) -> Self {
        Self::Run(e)
    }
}

fn resolve_speed(
    sim: &Simulation,
    spec: SpeedSpec,
    min_speed: f64,
    max_speed: f64,
    rng: &mut ChaCha8Rng,
) -> SpeedInput {
    match spec {
        SpeedSpec::Input(input) => input,
        SpeedSpec::Sampler(kind) => {
            let shape = sim.grid().shape().to_vec();
            SpeedInput::Array(sample_speed(kind, &shape, min_speed, max_speed, rng))
        }
    }
}

/// Builds a [`Simulation`], optionally generates its speed field from a
/// sampler, attaches a single source and detector, runs it, and returns
/// `(detected_wave, grid_speed)` with `grid_speed` given a leading
/// singleton axis.
#[allow(clippy::too_many_arguments)]
pub fn run_single_source(
    size: &[f64],
    spacing: f64,
    max_speed: f64,
    time_step: Option<f64>,
    pml_thickness: usize,
    speed_spec: SpeedSpec,
    min_speed: f64,
    location: Vec<Coordinate>,
    period: f64,
    ncycles: Option<f64>,
    phase: f64,
    spatial_downsample: usize,
    boundary: usize,
    edge: Option<usize>,
    with_pml: bool,
    duration: f64,
    temporal_downsample: usize,
    rng: &mut ChaCha8Rng,
) -> Result<(ArrayD<f64>, ArrayD<f64>), RunnerError> {
    let mut sim = Simulation::new(size, spacing, max_speed, time_step, pml_thickness)?;
    let input = resolve_speed(&sim, speed_spec, min_speed, max_speed, rng);
    sim.set_speed(input, min_speed, Some(max_speed))?;
    sim.add_source(location, period, ncycles, phase)
        .map_err(RunnerError::Source)?;
    sim.add_detector(spatial_downsample, boundary, edge, with_pml)?;
    sim.run(duration, temporal_downsample)?;

    let wave = sim
        .detected_wave()
        .expect("run populated detected_wave")
        .clone();
    let speed = sim.grid_speed().clone().insert_axis(Axis(0));
    Ok((wave, speed))
}

/// Builds a single [`Simulation`] and speed field (generated once), then
/// runs each of `sources` in turn against the same detector, stacking
/// their `detected_wave` outputs along a new leading axis. Returns
/// `(stacked_waves, grid_speed)` with `grid_speed` given two leading
/// singleton axes.
#[allow(clippy::too_many_arguments)]
pub fn run_multiple_sources(
    size: &[f64],
    spacing: f64,
    max_speed: f64,
    time_step: Option<f64>,
    pml_thickness: usize,
    speed_spec: SpeedSpec,
    min_speed: f64,
    sources: Vec<SourceSpec>,
    spatial_downsample: usize,
    boundary: usize,
    edge: Option<usize>,
    with_pml: bool,
    duration: f64,
    temporal_downsample: usize,
    rng: &mut ChaCha8Rng,
) -> Result<(ArrayD<f64>, ArrayD<f64>), RunnerError> {
    let mut sim = Simulation::new(size, spacing, max_speed, time_step, pml_thickness)?;
    let input = resolve_speed(&sim, speed_spec, min_speed, max_speed, rng);
    sim.set_speed(input, min_speed, Some(max_speed))?;
    sim.add_detector(spatial_downsample, boundary, edge, with_pml)?;

    let mut waves = Vec::with_capacity(sources.len());
    for spec in sources {
        sim.add_source(spec.location, spec.period, spec.ncycles, spec.phase)
            .map_err(RunnerError::Source)?;
        sim.run(duration, temporal_downsample)?;
        waves.push(sim.detected_wave().expect("run populated detected_wave").clone());
    }

    let views: Vec<_> = waves.iter().map(|w| w.view()).collect();
    let stacked = ndarray::stack(Axis(0), &views).expect("every run shares the same detector shape");
    let speed = sim
        .grid_speed()
        .clone()
        .insert_axis(Axis(0))
        .insert_axis(Axis(0));
    Ok((stacked, speed))
}
