//! Split-field PML acoustic wave equation.
//!
//! Integrates the scalar acoustic wave equation via an explicit leapfrog
//! velocity/pressure split, with a Perfectly Matched Layer absorbing the
//! outgoing wave at the padded boundary.
//!
//! ```text
//! g  = grad(P)                         (forward diff, zero-appended)
//! v -= D*g + dt*c*sigma*v
//! dv = div(v)                          (backward diff, zero-prepended)
//! P -= D*c^2*dv + dt*c*sigma_sum*P - Q
//! ```
//! with `D = dt/dx`.
//!
//! Constructed via the builder pattern: [`WaveEquation::builder`].

use ndarray::{ArrayD, Axis, IxDyn, Slice};

/// PML damping exponent; the ramp is `((L-i)/L * sigma_max)^PML_EXPONENT`.
const PML_EXPONENT: i32 = 3;

/// Split-field pressure/velocity PML wave equation core.
///
/// Holds mutable state (`pressure`, `velocity`, precomputed `damping`)
/// across steps. `full_shape` is the PML-padded grid shape.
#[derive(Debug, Clone)]
pub struct WaveEquation {
    full_shape: Vec<usize>,
    spacing: f64,
    speed: ArrayD<f64>,
    pressure: ArrayD<f64>,
    velocity: Vec<ArrayD<f64>>,
    damping: Vec<ArrayD<f64>>,
}

/// Builder for [`WaveEquation`].
///
/// Required fields: `full_shape`, `spacing`, and `speed`.
pub struct WaveEquationBuilder {
    full_shape: Option<Vec<usize>>,
    spacing: f64,
    pml_thickness: usize,
    speed: Option<ArrayD<f64>>,
}

impl WaveEquation {
    /// Create a new builder for configuring a `WaveEquation`.
    pub fn builder() -> WaveEquationBuilder {
        WaveEquationBuilder {
            full_shape: None,
            spacing: 1.0,
            pml_thickness: 0,
            speed: None,
        }
    }

    /// Largest time step for which the Courant condition holds, given the
    /// grid spacing, the maximum wave speed present, and the
    /// dimensionality `ndim`.
    ///
    /// `courant <= 0.9 / sqrt(ndim)`.
    pub fn max_stable_dt(spacing: f64, max_speed: f64, ndim: usize) -> f64 {
        (0.9 / (ndim as f64).sqrt()) * spacing / max_speed
    }

    /// Current pressure field, shaped `full_shape`.
    pub fn pressure(&self) -> &ArrayD<f64> {
        &self.pressure
    }

    /// Advances the state by one step of size `dt`, driven by the padded
    /// source field `source` (shape `full_shape`).
    pub fn step(&mut self, dt: f64, source: &ArrayD<f64>) {
        let d_coef = dt / self.spacing;
        let ndim = self.full_shape.len();

        let grads: Vec<ArrayD<f64>> = (0..ndim)
            .map(|axis| forward_diff_append_zero(&self.pressure, axis))
            .collect();

        for axis in 0..ndim {
            let damping_term = &self.speed * &self.damping[axis] * &self.velocity[axis] * dt;
            self.velocity[axis] = &self.velocity[axis] - &grads[axis] * d_coef - damping_term;
        }

        let mut divergence = ArrayD::<f64>::zeros(IxDyn(&self.full_shape));
        for axis in 0..ndim {
            divergence += &backward_diff_prepend_zero(&self.velocity[axis], axis);
        }

        let mut damping_sum = ArrayD::<f64>::zeros(IxDyn(&self.full_shape));
        for axis in 0..ndim {
            damping_sum += &self.damping[axis];
        }

        let c_squared = &self.speed * &self.speed;
        self.pressure = &self.pressure - &c_squared * &divergence * d_coef
            - &self.speed * &damping_sum * &self.pressure * dt
            + source;
    }
}

fn forward_diff_append_zero(field: &ArrayD<f64>, axis: usize) -> ArrayD<f64> {
    let mut out = ArrayD::<f64>::zeros(field.raw_dim());
    let len = field.shape()[axis];
    if len > 1 {
        let hi = field.slice_axis(Axis(axis), Slice::from(1..len)).to_owned();
        let lo = field.slice_axis(Axis(axis), Slice::from(0..len - 1));
        let diff = hi - lo;
        out.slice_axis_mut(Axis(axis), Slice::from(0..len - 1)).assign(&diff);
    }
    out
}

fn backward_diff_prepend_zero(field: &ArrayD<f64>, axis: usize) -> ArrayD<f64> {
    let mut out = ArrayD::<f64>::zeros(field.raw_dim());
    let len = field.shape()[axis];
    if len > 1 {
        let hi = field.slice_axis(Axis(axis), Slice::from(1..len)).to_owned();
        let lo = field.slice_axis(Axis(axis), Slice::from(0..len - 1));
        let diff = hi - lo;
        out.slice_axis_mut(Axis(axis), Slice::from(1..len)).assign(&diff);
    }
    out
}

fn build_damping_axis(full_shape: &[usize], axis: usize, thickness: usize, sigma_max: f64) -> ArrayD<f64> {
    let len = full_shape[axis];
    ArrayD::from_shape_fn(IxDyn(full_shape), |idx| {
        let i = idx[axis];
        let l = thickness;
        if l == 0 {
            return 0.0;
        }
        let m = if i < l {
            Some(i)
        } else if i >= len - l {
            Some(len - 1 - i)
        } else {
            None
        };
        match m {
            Some(m) => (((l - m) as f64 / l as f64) * sigma_max).powi(PML_EXPONENT),
            None => 0.0,
        }
    })
}

impl WaveEquationBuilder {
    /// Set the padded grid shape (`Grid::full_shape`).
    pub fn full_shape(mut self, shape: Vec<usize>) -> Self {
        self.full_shape = Some(shape);
        self
    }

    /// Set the isotropic cell spacing (default: 1.0). Must be > 0.
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the PML thickness in cells (default: 0 — no absorption).
    pub fn pml_thickness(mut self, thickness: usize) -> Self {
        self.pml_thickness = thickness;
        self
    }

    /// Set the padded speed field (shape must equal `full_shape`).
    pub fn speed(mut self, speed: ArrayD<f64>) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Build the wave equation state, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `full_shape` is not set or has zero dimensions
    /// - `spacing` is not > 0 or is NaN
    /// - `speed` is not set or its shape does not match `full_shape`
    pub fn build(self) -> Result<WaveEquation, String> {
        let full_shape = self
            .full_shape
            .ok_or_else(|| "full_shape is required".to_string())?;
        if full_shape.is_empty() {
            return Err("full_shape must have at least one axis".to_string());
        }
        if !(self.spacing > 0.0) {
            return Err(format!("spacing must be finite and > 0, got {}", self.spacing));
        }
        let speed = self.speed.ok_or_else(|| "speed is required".to_string())?;
        if speed.shape() != full_shape.as_slice() {
            return Err(format!(
                "speed shape {:?} does not match full_shape {:?}",
                speed.shape(),
                full_shape
            ));
        }

        let sigma_max = self.pml_thickness as f64;
        let ndim = full_shape.len();
        let damping: Vec<ArrayD<f64>> = (0..ndim)
            .map(|axis| build_damping_axis(&full_shape, axis, self.pml_thickness, sigma_max))
            .collect();
        let velocity: Vec<ArrayD<f64>> = (0..ndim)
            .map(|_| ArrayD::zeros(IxDyn(&full_shape)))
            .collect();
        let pressure = ArrayD::zeros(IxDyn(&full_shape));

        Ok(WaveEquation {
            full_shape,
            spacing: self.spacing,
            speed,
            pressure,
            velocity,
            damping,
        })
    }
}
