//! Orchestrator binding Grid/Time/Source/Detector/SpeedField/WaveEquation.

use ndarray::{ArrayD, Axis, IxDyn};
use wavesim_core::{ConfigError, Coordinate, DetectorError, Grid, RunError, SpeedError, Time};
use wavesim_space::Detector;
use wavesim_propagator::{Source, SpeedField, SpeedInput, WaveEquation};

/// Binds a [`Grid`], the driving [`Source`], the sampling [`Detector`],
/// and the [`WaveEquation`] core into one runnable simulation.
///
/// `new` derives or validates the stable time step; `set_speed`,
/// `add_source`, and `add_detector` configure the run; `run` executes the
/// step loop and fills the detected buffers.
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    max_speed: f64,
    time_step: f64,
    speed: SpeedField,
    source: Option<Source>,
    detector_cfg: Option<DetectorConfig>,
    time: Option<Time>,
    detected_wave: Option<ArrayD<f64>>,
    detected_source: Option<ArrayD<f64>>,
}

#[derive(Debug)]
struct DetectorConfig {
    detector: Detector,
    with_pml: bool,
}

impl Simulation {
    /// Builds a new simulation: constructs the grid, initializes the
    /// interior speed field to `max_speed`, and either validates a
    /// user-supplied `time_step` against the Courant limit or derives one.
    ///
    /// When `time_step` is `None`, the derived step rounds the maximum
    /// stable step down to a single significant decimal digit.
    pub fn new(
        size: &[f64],
        spacing: f64,
        max_speed: f64,
        time_step: Option<f64>,
        pml_thickness: usize,
    ) -> Result<Self, ConfigError> {
        let grid = Grid::new(size, spacing, pml_thickness).map_err(ConfigError::Grid)?;
        if max_speed <= 0.0 {
            return Err(ConfigError::StabilityViolation {
                requested_step: time_step.unwrap_or(0.0),
                max_stable_step: 0.0,
            });
        }
        let max_step = WaveEquation::max_stable_dt(spacing, max_speed, grid.ndim());

        let resolved_step = match time_step {
            Some(requested) => {
                if requested > max_step {
                    return Err(ConfigError::StabilityViolation {
                        requested_step: requested,
                        max_stable_step: max_step,
                    });
                }
                requested
            }
            None => round_down_one_sig_digit(max_step),
        };

        log::debug!(
            "simulation time step {resolved_step} (max stable {max_step}, ndim {})",
            grid.ndim()
        );

        let speed = SpeedField::set_speed(grid.shape(), SpeedInput::Scalar(max_speed), 0.0, max_speed)
            .expect("max_speed is strictly positive by construction");

        Ok(Simulation {
            grid,
            max_speed,
            time_step: resolved_step,
            speed,
            source: None,
            detector_cfg: None,
            time: None,
            detected_wave: None,
            detected_source: None,
        })
    }

    /// The grid descriptor.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The time descriptor, populated once `run` has completed.
    pub fn time(&self) -> Option<&Time> {
        self.time.as_ref()
    }

    /// The interior speed field.
    pub fn grid_speed(&self) -> &ArrayD<f64> {
        self.speed.interior()
    }

    /// The detector geometry, once configured.
    pub fn detector(&self) -> Option<&Detector> {
        self.detector_cfg.as_ref().map(|cfg| &cfg.detector)
    }

    /// Detected wave buffer, populated once `run` has completed.
    pub fn detected_wave(&self) -> Option<&ArrayD<f64>> {
        self.detected_wave.as_ref()
    }

    /// Detected source buffer, populated once `run` has completed.
    pub fn detected_source(&self) -> Option<&ArrayD<f64>> {
        self.detected_source.as_ref()
    }

    /// Replaces the interior speed field, clipping to
    /// `[min_speed, min(max_speed, simulation max_speed)]`. Invalidates
    /// any previously recorded run.
    pub fn set_speed(
        &mut self,
        input: SpeedInput,
        min_speed: f64,
        max_speed: Option<f64>,
    ) -> Result<(), SpeedError> {
        let effective_max = max_speed.unwrap_or(self.max_speed).min(self.max_speed);
        self.speed = SpeedField::set_speed(self.grid.shape(), input, min_speed, effective_max)?;
        self.detected_wave = None;
        self.detected_source = None;
        Ok(())
    }

    /// Attaches a driving source. Invalidates any previously recorded run.
    pub fn add_source(
        &mut self,
        location: Vec<Coordinate>,
        period: f64,
        ncycles: Option<f64>,
        phase: f64,
    ) -> Result<(), String> {
        let source = Source::builder()
            .grid_shape(self.grid.shape().to_vec())
            .spacing(self.grid.spacing())
            .location(location)
            .period(period)
            .ncycles(ncycles)
            .phase(phase)
            .build()?;
        self.source = Some(source);
        self.detected_wave = None;
        self.detected_source = None;
        Ok(())
    }

    /// Attaches a detector. `with_pml` samples `Grid::full_shape` rather
    /// than the interior, and is rejected together with `boundary > 0`.
    /// Invalidates any previously recorded run.
    pub fn add_detector(
        &mut self,
        spatial_downsample: usize,
        boundary: usize,
        edge: Option<usize>,
        with_pml: bool,
    ) -> Result<(), DetectorError> {
        if with_pml && boundary > 0 {
            return Err(DetectorError::GeometryMismatch {
                shape: self.grid.full_shape().to_vec(),
            });
        }
        let shape = if with_pml { self.grid.full_shape() } else { self.grid.shape() };
        let detector = Detector::new(shape, spatial_downsample, boundary, edge)?;
        self.detector_cfg = Some(DetectorConfig { detector, with_pml });
        self.detected_wave = None;
        self.detected_source = None;
        Ok(())
    }

    /// Runs the step loop for `duration`, recording every
    /// `temporal_downsample`-th step into the detected buffers.
    ///
    /// Reallocates all buffers on every call.
    pub fn run(&mut self, duration: f64, temporal_downsample: usize) -> Result<(), RunError> {
        let source = self.source.as_ref().ok_or(RunError::MissingSource)?;
        let detector_cfg = self.detector_cfg.as_ref().ok_or(RunError::MissingDetector)?;
        let time = Time::new(self.time_step, duration, temporal_downsample).map_err(RunError::Time)?;

        let pml_thickness = self.grid.pml_thickness();
        let full_shape = self.grid.full_shape().to_vec();
        let padded_speed = self.speed.pad(pml_thickness);

        let mut wave_eq = WaveEquation::builder()
            .full_shape(full_shape.clone())
            .spacing(self.grid.spacing())
            .pml_thickness(pml_thickness)
            .speed(padded_speed)
            .build()
            .expect("padded speed shape matches full_shape by construction");

        let mut detected_shape = vec![time.nsteps_detected()];
        detected_shape.extend(detector_cfg.detector.detected_shape());
        let mut detected_wave = ArrayD::<f64>::zeros(IxDyn(&detected_shape));
        let mut detected_source = ArrayD::<f64>::zeros(IxDyn(&detected_shape));

        for step in 0..time.nsteps() {
            let t = step as f64 * time.step();
            let source_interior = source.value(t);
            let padded_source = embed_interior(&source_interior, pml_thickness);

            wave_eq.step(time.step(), &padded_source);

            if step % temporal_downsample == 0 {
                let index = step / temporal_downsample;

                let wave_full = if detector_cfg.with_pml {
                    wave_eq.pressure().clone()
                } else {
                    crop_interior(wave_eq.pressure(), pml_thickness)
                };
                let source_full = if detector_cfg.with_pml {
                    padded_source.clone()
                } else {
                    source_interior.clone()
                };

                let downsampled_wave = detector_cfg.detector.downsample_grid(&wave_full);
                let sampled_wave = detector_cfg.detector.sample(&downsampled_wave);
                detected_wave.index_axis_mut(Axis(0), index).assign(&sampled_wave);

                let downsampled_source = detector_cfg.detector.downsample_grid(&source_full);
                let sampled_source = detector_cfg.detector.sample(&downsampled_source);
                detected_source.index_axis_mut(Axis(0), index).assign(&sampled_source);
            }
        }

        self.time = Some(time);
        self.detected_wave = Some(detected_wave);
        self.detected_source = Some(detected_source);
        Ok(())
    }
}

fn round_down_one_sig_digit(value: f64) -> f64 {
    let exponent = value.log10().floor();
    let p = 10f64.powf(exponent);
    let coef = (value / p).floor();
    coef * p
}

fn crop_interior(full: &ArrayD<f64>, pml_thickness: usize) -> ArrayD<f64> {
    if pml_thickness == 0 {
        return full.clone();
    }
    let mut view = full.view();
    for axis in 0..full.ndim() {
        let len = view.shape()[axis];
        view = view.slice_axis(Axis(axis), ndarray::Slice::from(pml_thickness..len - pml_thickness));
    }
    view.to_owned()
}

fn embed_interior(interior: &ArrayD<f64>, pml_thickness: usize) -> ArrayD<f64> {
    let full_shape: Vec<usize> = interior.shape().iter().map(|&n| n + 2 * pml_thickness).collect();
    let mut out = ArrayD::<f64>::zeros(IxDyn(&full_shape));
    {
        let mut view = out.view_mut();
        for axis in 0..interior.ndim() {
            let len = view.shape()[axis];
            view = view.slice_axis_mut(Axis(axis), ndarray::Slice::from(pml_thickness..len - pml_thickness));
        }
        view.assign(interior);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn derived_step_always_satisfies_courant(
            size in 1.0e-3_f64..0.1,
            spacing in 1.0e-4_f64..1.0e-3,
            max_speed in 1.0_f64..2000.0,
        ) {
            let sim = Simulation::new(&[size], spacing, max_speed, None, 10).unwrap();
            let ndim = sim.grid().ndim() as f64;
            prop_assert!(sim.time_step * max_speed / spacing <= 0.9 / ndim.sqrt() + 1e-12);
        }
    }

    #[test]
    fn rounds_down_to_one_significant_digit() {
        assert!((round_down_one_sig_digit(0.00012345) - 0.0001).abs() < 1e-12);
        assert!((round_down_one_sig_digit(686.0) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_1d_full_grid_baseline() {
        let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        assert_eq!(sim.grid().shape(), &[128]);
        sim.add_source(vec![Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0).unwrap();
        sim.add_detector(1, 0, None, false).unwrap();
        sim.run(20e-6, 1).unwrap();
        assert_eq!(sim.time().unwrap().nsteps(), 400);
        assert_eq!(sim.detected_wave().unwrap().shape(), &[400, 128]);
    }

    #[test]
    fn scenario_1d_half_time_thick_boundary() {
        let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        sim.add_source(vec![Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0).unwrap();
        sim.add_detector(1, 5, None, false).unwrap();
        sim.run(20e-6, 2).unwrap();
        assert_eq!(sim.detected_wave().unwrap().shape(), &[200, 10]);
    }

    #[test]
    fn scenario_2d_full_boundary() {
        let mut sim = Simulation::new(&[12.8e-3, 12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        sim.add_source(vec![Coordinate::Fixed(0.0), Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0)
            .unwrap();
        sim.add_detector(1, 1, None, false).unwrap();
        sim.run(20e-6, 2).unwrap();
        assert_eq!(sim.detected_wave().unwrap().shape(), &[200, 4, 128]);
    }

    #[test]
    fn scenario_2d_single_edge() {
        let mut sim = Simulation::new(&[12.8e-3, 12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        sim.add_source(vec![Coordinate::Fixed(0.0), Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0)
            .unwrap();
        sim.add_detector(1, 1, Some(0), false).unwrap();
        sim.run(20e-6, 2).unwrap();
        assert_eq!(sim.detected_wave().unwrap().shape(), &[200, 1, 128]);
    }

    #[test]
    fn rejects_time_step_above_stability_limit() {
        let err = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(1e-3), 20).unwrap_err();
        assert!(matches!(err, ConfigError::StabilityViolation { .. }));
    }

    #[test]
    fn rejects_non_positive_max_speed() {
        let err = Simulation::new(&[12.8e-3], 1e-4, 0.0, None, 20).unwrap_err();
        assert!(matches!(err, ConfigError::StabilityViolation { .. }));
    }

    #[test]
    fn run_before_source_fails() {
        let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        sim.add_detector(1, 0, None, false).unwrap();
        assert_eq!(sim.run(20e-6, 1).unwrap_err(), RunError::MissingSource);
    }

    #[test]
    fn run_before_detector_fails() {
        let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        sim.add_source(vec![Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0).unwrap();
        assert_eq!(sim.run(20e-6, 1).unwrap_err(), RunError::MissingDetector);
    }

    #[test]
    fn with_pml_and_boundary_is_rejected() {
        let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        let err = sim.add_detector(1, 1, None, true).unwrap_err();
        assert!(matches!(err, DetectorError::GeometryMismatch { .. }));
    }

    #[test]
    fn rerunning_reallocates_detected_buffers() {
        let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, Some(5e-8), 20).unwrap();
        sim.add_source(vec![Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0).unwrap();
        sim.add_detector(1, 0, None, false).unwrap();
        sim.run(20e-6, 1).unwrap();
        sim.run(10e-6, 1).unwrap();
        assert_eq!(sim.time().unwrap().nsteps(), 200);
        assert_eq!(sim.detected_wave().unwrap().shape(), &[200, 128]);
    }
}
