//! Source, speed field, and wave-equation propagation core for wavesim.
//!
//! # Per-step order
//!
//! 1. [`Source::value`] — evaluate the driving term at time `t`.
//! 2. [`WaveEquation::step`] — advance pressure/velocity by one `dt`,
//!    driven by the padded source field.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod samplers;
pub mod source;
pub mod speed;
pub mod wave_equation;

pub use samplers::{sample_speed, SamplerKind};
pub use source::{Source, SourceBuilder};
pub use speed::{SpeedField, SpeedInput};
pub use wave_equation::{WaveEquation, WaveEquationBuilder};
