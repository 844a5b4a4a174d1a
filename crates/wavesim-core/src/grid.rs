//! Immutable geometric descriptor for the simulated domain.

use crate::error::GridError;

/// Immutable geometric descriptor of an isotropic N-dimensional Cartesian
/// grid (`N ∈ {1, 2, 3}`).
///
/// `size` is given in physical units (meters); `spacing` is the isotropic
/// cell size. `shape` and `full_shape` are derived and cached at
/// construction time since they are read on every step.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: Vec<f64>,
    spacing: f64,
    pml_thickness: usize,
    shape: Vec<usize>,
    full_shape: Vec<usize>,
}

impl Grid {
    /// Builds a grid from physical extents, an isotropic spacing, and a
    /// PML thickness in cells.
    ///
    /// `size.len()` fixes the dimensionality and must be 1, 2, or 3.
    pub fn new(size: &[f64], spacing: f64, pml_thickness: usize) -> Result<Self, GridError> {
        let ndim = size.len();
        if !(1..=3).contains(&ndim) {
            return Err(GridError::UnsupportedDimensionality { ndim });
        }
        if spacing <= 0.0 {
            return Err(GridError::NonPositiveSpacing);
        }
        let shape: Vec<usize> = size
            .iter()
            .map(|s| (s / spacing).floor() as usize)
            .collect();
        for (axis, &len) in shape.iter().enumerate() {
            if len == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
        }
        let full_shape: Vec<usize> = shape.iter().map(|&n| n + 2 * pml_thickness).collect();
        Ok(Grid {
            size: size.to_vec(),
            spacing,
            pml_thickness,
            shape,
            full_shape,
        })
    }

    /// Number of spatial dimensions (1, 2, or 3).
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Physical extents supplied at construction, in meters.
    pub fn size(&self) -> &[f64] {
        &self.size
    }

    /// Isotropic cell spacing.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// PML slab thickness in cells.
    pub fn pml_thickness(&self) -> usize {
        self.pml_thickness
    }

    /// Interior shape, `floor(size[i] / spacing)` per axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Padded shape, `shape[i] + 2 * pml_thickness` per axis.
    pub fn full_shape(&self) -> &[usize] {
        &self.full_shape
    }

    /// Total number of interior cells.
    pub fn interior_len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Total number of padded cells.
    pub fn full_len(&self) -> usize {
        self.full_shape.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_shape_and_full_shape() {
        let grid = Grid::new(&[12.8e-3], 1e-4, 20).unwrap();
        assert_eq!(grid.shape(), &[128]);
        assert_eq!(grid.full_shape(), &[168]);
        assert_eq!(grid.ndim(), 1);
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = Grid::new(&[], 1e-4, 20).unwrap_err();
        assert_eq!(err, GridError::UnsupportedDimensionality { ndim: 0 });
    }

    #[test]
    fn rejects_four_dimensions() {
        let err = Grid::new(&[1.0, 1.0, 1.0, 1.0], 1e-4, 20).unwrap_err();
        assert_eq!(err, GridError::UnsupportedDimensionality { ndim: 4 });
    }

    #[test]
    fn rejects_non_positive_spacing() {
        assert_eq!(
            Grid::new(&[1.0], 0.0, 0).unwrap_err(),
            GridError::NonPositiveSpacing
        );
        assert_eq!(
            Grid::new(&[1.0], -1.0, 0).unwrap_err(),
            GridError::NonPositiveSpacing
        );
    }

    #[test]
    fn rejects_empty_axis() {
        let err = Grid::new(&[1e-4, 0.0], 1e-4, 0).unwrap_err();
        assert_eq!(err, GridError::EmptyAxis { axis: 1 });
    }

    #[test]
    fn three_dimensional_grid() {
        let grid = Grid::new(&[3.2e-3, 3.2e-3, 3.2e-3], 1e-4, 2).unwrap();
        assert_eq!(grid.shape(), &[32, 32, 32]);
        assert_eq!(grid.full_shape(), &[36, 36, 36]);
    }
}
