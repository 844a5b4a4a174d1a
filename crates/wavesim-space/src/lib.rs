//! Detector geometry and coordinate resolution for the wavesim engine.
//!
//! Defines grid-stride downsampling and boundary/edge extraction, and the
//! location-to-index algebra shared by sources and detectors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod detector;
pub mod location;

pub use detector::{Detector, Edge};
pub use location::location_to_index;
