//! Scalar speed-of-wave field: construction, clipping, and resampling.

use ndarray::{ArrayD, IxDyn};
use wavesim_core::SpeedError;

/// Input to [`SpeedField::set_speed`]: either a full array (resampled if
/// its shape doesn't match the grid) or a scalar broadcast across every
/// cell.
#[derive(Clone, Debug)]
pub enum SpeedInput {
    /// A full speed array; must share the grid's dimensionality.
    Array(ArrayD<f64>),
    /// A single value broadcast across the whole grid.
    Scalar(f64),
}

/// Scalar speed-of-wave field defined on the grid's interior shape.
///
/// Values are clipped into `[min_speed, max_speed]` at construction; the
/// field is immutable for the duration of a run and replaced wholesale by
/// [`SpeedField::set_speed`].
#[derive(Clone, Debug)]
pub struct SpeedField {
    interior: ArrayD<f64>,
}

impl SpeedField {
    /// Builds a speed field over `grid_shape` from `input`, clipping to
    /// `[min_speed, max_speed]`.
    ///
    /// Resamples via a nearest-neighbour zoom when `input` is an array
    /// whose shape doesn't already match `grid_shape` but whose
    /// dimensionality does.
    ///
    /// # Errors
    ///
    /// Returns [`SpeedError::ShapeMismatch`] if an array input's
    /// dimensionality doesn't match `grid_shape.len()`, and
    /// [`SpeedError::InvalidRange`] if `min_speed >= max_speed`.
    pub fn set_speed(
        grid_shape: &[usize],
        input: SpeedInput,
        min_speed: f64,
        max_speed: f64,
    ) -> Result<Self, SpeedError> {
        if !(min_speed < max_speed) {
            return Err(SpeedError::InvalidRange { min_speed, max_speed });
        }
        let mut interior = match input {
            SpeedInput::Scalar(value) => ArrayD::from_elem(IxDyn(grid_shape), value),
            SpeedInput::Array(array) => {
                if array.ndim() != grid_shape.len() {
                    return Err(SpeedError::ShapeMismatch {
                        expected: grid_shape.to_vec(),
                        got: array.shape().to_vec(),
                    });
                }
                if array.shape() == grid_shape {
                    array
                } else {
                    resample_nearest(&array, grid_shape)
                }
            }
        };
        interior.mapv_inplace(|v| v.clamp(min_speed, max_speed));
        Ok(SpeedField { interior })
    }

    /// The interior speed array, shaped like `Grid::shape`.
    pub fn interior(&self) -> &ArrayD<f64> {
        &self.interior
    }

    /// Edge-replicate pads the interior field out to a PML-padded shape.
    pub fn pad(&self, pml_thickness: usize) -> ArrayD<f64> {
        let shape = self.interior.shape().to_vec();
        let full_shape: Vec<usize> = shape.iter().map(|&n| n + 2 * pml_thickness).collect();
        ArrayD::from_shape_fn(IxDyn(&full_shape), |idx| {
            let src: Vec<usize> = idx
                .slice()
                .iter()
                .zip(&shape)
                .map(|(&i, &len)| {
                    let shifted = i as isize - pml_thickness as isize;
                    shifted.clamp(0, len as isize - 1) as usize
                })
                .collect();
            self.interior[IxDyn(&src)]
        })
    }
}

fn resample_nearest(input: &ArrayD<f64>, target_shape: &[usize]) -> ArrayD<f64> {
    let input_shape = input.shape().to_vec();
    ArrayD::from_shape_fn(IxDyn(target_shape), |idx| {
        let src: Vec<usize> = idx
            .slice()
            .iter()
            .enumerate()
            .map(|(axis, &i)| {
                let in_len = input_shape[axis];
                let out_len = target_shape[axis];
                let ratio = in_len as f64 / out_len as f64;
                (((i as f64 + 0.5) * ratio).floor() as usize).min(in_len - 1)
            })
            .collect();
        input[IxDyn(&src)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn scalar_broadcast_always_lands_in_range(
            value in -1.0e4_f64..1.0e4,
            min_speed in 0.0_f64..500.0,
            max_speed in 500.0_f64..1000.0,
        ) {
            let field = SpeedField::set_speed(&[4, 4], SpeedInput::Scalar(value), min_speed, max_speed).unwrap();
            prop_assert!(field.interior().iter().all(|&v| v >= min_speed && v <= max_speed));
        }
    }

    #[test]
    fn scalar_input_broadcasts() {
        let field = SpeedField::set_speed(&[4, 4], SpeedInput::Scalar(343.0), 0.0, 686.0).unwrap();
        assert!(field.interior().iter().all(|&v| v == 343.0));
    }

    #[test]
    fn clips_out_of_range_values() {
        let array = ArrayD::from_shape_vec(IxDyn(&[3]), vec![-10.0, 343.0, 10_000.0]).unwrap();
        let field = SpeedField::set_speed(&[3], SpeedInput::Array(array), 0.0, 686.0).unwrap();
        assert_eq!(field.interior().as_slice().unwrap(), &[0.0, 343.0, 686.0]);
    }

    #[test]
    fn rejects_ndim_mismatch() {
        let array = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1.0; 4]).unwrap();
        let err = SpeedField::set_speed(&[4], SpeedInput::Array(array), 0.0, 686.0).unwrap_err();
        assert!(matches!(err, SpeedError::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_invalid_range() {
        let err = SpeedField::set_speed(&[4], SpeedInput::Scalar(1.0), 10.0, 5.0).unwrap_err();
        assert!(matches!(err, SpeedError::InvalidRange { .. }));
    }

    #[test]
    fn resamples_mismatched_shape() {
        let array = ArrayD::from_shape_vec(IxDyn(&[2]), vec![1.0, 2.0]).unwrap();
        let field = SpeedField::set_speed(&[4], SpeedInput::Array(array), 0.0, 10.0).unwrap();
        assert_eq!(field.interior().shape(), &[4]);
    }

    #[test]
    fn pad_replicates_edges() {
        let field = SpeedField::set_speed(&[4], SpeedInput::Scalar(343.0), 0.0, 686.0).unwrap();
        let padded = field.pad(2);
        assert_eq!(padded.shape(), &[8]);
        assert!(padded.iter().all(|&v| v == 343.0));
    }
}
