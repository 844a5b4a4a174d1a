//! wavesim: an acoustic FDTD wave simulator with split-field PML absorbing
//! boundaries.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all wavesim sub-crates. For most users, adding `wavesim` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use wavesim::prelude::*;
//!
//! // A 1D, 12.8 mm domain at 0.1 mm spacing, speed of sound 686 m/s,
//! // derived time step, and a 20-cell PML boundary.
//! let mut sim = Simulation::new(&[12.8e-3], 1e-4, 686.0, None, 20).unwrap();
//!
//! // A one-cycle pulse at the left edge.
//! sim.add_source(vec![Coordinate::Fixed(0.0)], 5e-6, Some(1.0), 0.0).unwrap();
//!
//! // Record the whole interior grid every step.
//! sim.add_detector(1, 0, None, false).unwrap();
//!
//! sim.run(20e-6, 1).unwrap();
//! assert_eq!(sim.detected_wave().unwrap().shape()[1], sim.grid().shape()[0]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `wavesim-core` | `Grid`, `Time`, `Coordinate`, error types |
//! | [`space`] | `wavesim-space` | `Detector`, location-to-index resolution |
//! | [`propagator`] | `wavesim-propagator` | `Source`, `SpeedField`, samplers, `WaveEquation` |
//! | [`engine`] | `wavesim-engine` | `Simulation` orchestrator and convenience runners |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid and time descriptors, coordinates, and error types (`wavesim-core`).
pub use wavesim_core as core;

/// Detector geometry and location resolution (`wavesim-space`).
pub use wavesim_space as space;

/// Source, speed field, samplers, and the PML wave equation (`wavesim-propagator`).
pub use wavesim_propagator as propagator;

/// The `Simulation` orchestrator and one-shot convenience runners (`wavesim-engine`).
pub use wavesim_engine as engine;

/// Common imports for typical wavesim usage.
///
/// ```rust
/// use wavesim::prelude::*;
/// ```
pub mod prelude {
    pub use wavesim_core::{
        ConfigError, Coordinate, DetectorError, Grid, GridError, RunError, SamplerError,
        SpeedError, Time, TimeError,
    };
    pub use wavesim_space::{Detector, Edge};
    pub use wavesim_propagator::{
        sample_speed, SamplerKind, Source, SourceBuilder, SpeedField, SpeedInput, WaveEquation,
        WaveEquationBuilder,
    };
    pub use wavesim_engine::{
        run_multiple_sources, run_single_source, RunnerError, Simulation, SourceSpec, SpeedSpec,
    };
}
