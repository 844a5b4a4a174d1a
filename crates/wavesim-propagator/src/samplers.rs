//! Closed catalog of procedural speed-field generators.
//!
//! Modeled as a tagged variant plus a pure dispatch function — the set of
//! samplers is fixed, so no registry or extension point is needed.

use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;
use wavesim_core::SamplerError;

/// Number of spectral modes summed by the `fourier` sampler.
const FOURIER_MODES: usize = 6;

/// Wavevector magnitude bound (radians per cell) for the `fourier`
/// sampler's random modes.
const FOURIER_K_MAX: f64 = PI / 2.0;

/// The closed set of named speed-field generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerKind {
    /// Constant field at `min_speed`.
    Flat,
    /// Uniform i.i.d. noise in `[min_speed, max_speed]`.
    Random,
    /// Tensor product of per-axis low-frequency inverse-DFT samples.
    Ifft,
    /// Sum of random cosine spectral modes.
    Fourier,
    /// Coin flip between `Random` and `Ifft`.
    MixedRandomIfft,
    /// Coin flip between `Random` and `Fourier`.
    MixedRandomFourier,
}

impl SamplerKind {
    /// Parses one of the sampler tags: `flat`, `random`, `ifft`,
    /// `fourier`, `mixed_random_ifft`, `mixed_random_fourier`.
    pub fn parse(name: &str) -> Result<Self, SamplerError> {
        match name {
            "flat" => Ok(Self::Flat),
            "random" => Ok(Self::Random),
            "ifft" => Ok(Self::Ifft),
            "fourier" => Ok(Self::Fourier),
            "mixed_random_ifft" => Ok(Self::MixedRandomIfft),
            "mixed_random_fourier" => Ok(Self::MixedRandomFourier),
            other => Err(SamplerError::UnknownSampler { name: other.to_string() }),
        }
    }
}

/// Generates a speed field of the given `shape`, rescaled into
/// `[min_speed, max_speed]`.
pub fn sample_speed(
    kind: SamplerKind,
    shape: &[usize],
    min_speed: f64,
    max_speed: f64,
    rng: &mut ChaCha8Rng,
) -> ArrayD<f64> {
    match kind {
        SamplerKind::Flat => ArrayD::from_elem(IxDyn(shape), min_speed),
        SamplerKind::Random => {
            ArrayD::from_shape_fn(IxDyn(shape), |_| rng.random_range(min_speed..max_speed))
        }
        SamplerKind::Ifft => rescale(tensor_product_ifft(shape, rng), min_speed, max_speed),
        SamplerKind::Fourier => rescale(normalize(fourier_modes(shape, rng)), min_speed, max_speed),
        SamplerKind::MixedRandomIfft => {
            if rng.random_bool(0.5) {
                sample_speed(SamplerKind::Random, shape, min_speed, max_speed, rng)
            } else {
                sample_speed(SamplerKind::Ifft, shape, min_speed, max_speed, rng)
            }
        }
        SamplerKind::MixedRandomFourier => {
            if rng.random_bool(0.5) {
                sample_speed(SamplerKind::Random, shape, min_speed, max_speed, rng)
            } else {
                sample_speed(SamplerKind::Fourier, shape, min_speed, max_speed, rng)
            }
        }
    }
}

fn rescale(unit: ArrayD<f64>, min_speed: f64, max_speed: f64) -> ArrayD<f64> {
    unit.mapv(|v| min_speed + v * (max_speed - min_speed))
}

fn normalize(field: ArrayD<f64>) -> ArrayD<f64> {
    let lo = field.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = field.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    if span <= 0.0 {
        return field.mapv(|_| 0.0);
    }
    field.mapv(|v| (v - lo) / span)
}

fn tensor_product_ifft(shape: &[usize], rng: &mut ChaCha8Rng) -> ArrayD<f64> {
    let per_axis: Vec<Vec<f64>> = shape.iter().map(|&len| ifft_sample_1d(len, rng)).collect();
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        idx.slice()
            .iter()
            .zip(&per_axis)
            .map(|(&i, axis_values)| axis_values[i])
            .product()
    })
}

/// `|IFFT(w)|` over a random low-frequency cutoff, cyclically rolled and
/// clipped to `[0, 1]`.
fn ifft_sample_1d(length: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    let freq_cutoff = rng.random_range(0..length);
    if freq_cutoff == 0 {
        return vec![0.0; length];
    }

    let raw_weights: Vec<f64> = (0..freq_cutoff).map(|_| rng.random::<f64>()).collect();
    let total: f64 = raw_weights.iter().sum();
    let weights: Vec<f64> = raw_weights.iter().map(|w| w / total).collect();

    let mut spectrum = vec![0.0; length];
    for (k, w) in weights.iter().enumerate() {
        spectrum[k] = length as f64 * w;
    }

    let mut magnitude = vec![0.0; length];
    for n in 0..length {
        let mut re = 0.0;
        let mut im = 0.0;
        for (k, &x) in spectrum.iter().enumerate().take(freq_cutoff) {
            let theta = 2.0 * PI * (k as f64) * (n as f64) / (length as f64);
            re += x * theta.cos();
            im += x * theta.sin();
        }
        re /= length as f64;
        im /= length as f64;
        magnitude[n] = (re * re + im * im).sqrt();
    }

    let shift = rng.random_range(0..length);
    let mut rolled = vec![0.0; length];
    for n in 0..length {
        let src = (n + length - shift) % length;
        rolled[n] = magnitude[src].clamp(0.0, 1.0);
    }
    rolled
}

fn fourier_modes(shape: &[usize], rng: &mut ChaCha8Rng) -> ArrayD<f64> {
    let ndim = shape.len();
    let wavevectors: Vec<Vec<f64>> = (0..FOURIER_MODES)
        .map(|_| (0..ndim).map(|_| rng.random_range(-FOURIER_K_MAX..FOURIER_K_MAX)).collect())
        .collect();
    let raw_weights: Vec<f64> = (0..FOURIER_MODES).map(|_| rng.random::<f64>()).collect();
    let total: f64 = raw_weights.iter().sum();
    let weights: Vec<f64> = raw_weights.iter().map(|w| w / total).collect();
    let phases: Vec<f64> = (0..FOURIER_MODES).map(|_| rng.random_range(0.0..2.0 * PI)).collect();

    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        (0..FOURIER_MODES)
            .map(|m| {
                let dot: f64 = idx
                    .slice()
                    .iter()
                    .zip(&wavevectors[m])
                    .map(|(&coord, &k)| k * coord as f64)
                    .sum();
                weights[m] * (dot + phases[m]).cos()
            })
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn parse_accepts_known_tags() {
        for tag in [
            "flat",
            "random",
            "ifft",
            "fourier",
            "mixed_random_ifft",
            "mixed_random_fourier",
        ] {
            assert!(SamplerKind::parse(tag).is_ok());
        }
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let err = SamplerKind::parse("bogus").unwrap_err();
        assert!(matches!(err, SamplerError::UnknownSampler { .. }));
    }

    #[test]
    fn flat_returns_min_speed() {
        let field = sample_speed(SamplerKind::Flat, &[4], 100.0, 686.0, &mut rng());
        assert!(field.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn random_is_bounded() {
        let field = sample_speed(SamplerKind::Random, &[32], 100.0, 686.0, &mut rng());
        assert!(field.iter().all(|&v| (100.0..686.0).contains(&v)));
    }

    #[test]
    fn ifft_is_bounded_and_shaped() {
        let field = sample_speed(SamplerKind::Ifft, &[8, 8], 100.0, 686.0, &mut rng());
        assert_eq!(field.shape(), &[8, 8]);
        assert!(field.iter().all(|&v| (100.0..=686.0).contains(&v)));
    }

    #[test]
    fn fourier_is_bounded() {
        let field = sample_speed(SamplerKind::Fourier, &[16], 100.0, 686.0, &mut rng());
        assert!(field.iter().all(|&v| (100.0..=686.0).contains(&v)));
    }

    #[test]
    fn determinism_same_seed_same_output() {
        let a = sample_speed(SamplerKind::Ifft, &[16], 100.0, 686.0, &mut rng());
        let b = sample_speed(SamplerKind::Ifft, &[16], 100.0, 686.0, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn mixed_samplers_stay_bounded() {
        let field = sample_speed(SamplerKind::MixedRandomIfft, &[10], 50.0, 500.0, &mut rng());
        assert!(field.iter().all(|&v| (50.0..=500.0).contains(&v)));
        let field = sample_speed(SamplerKind::MixedRandomFourier, &[10], 50.0, 500.0, &mut rng());
        assert!(field.iter().all(|&v| (50.0..=500.0).contains(&v)));
    }
}
