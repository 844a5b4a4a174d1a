//! Core descriptors and error types for the wavesim acoustic FDTD engine.
//!
//! This is the leaf crate with zero internal wavesim dependencies. It
//! defines the grid and time descriptors, the per-axis coordinate type,
//! and the error enums shared by every other crate in the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coordinate;
pub mod error;
pub mod grid;
pub mod time;

pub use coordinate::Coordinate;
pub use error::{
    ConfigError, DetectorError, GridError, RunError, SamplerError, SpeedError, TimeError,
};
pub use grid::Grid;
pub use time::Time;
