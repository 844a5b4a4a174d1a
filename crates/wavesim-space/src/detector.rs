//! Geometric selector computing detected-tensor shapes and performing
//! grid-stride and boundary/edge sampling.

use ndarray::{ArrayD, IxDyn};
use wavesim_core::DetectorError;

/// Which edge of the grid a single-edge detector samples.
///
/// `dim = edge_index % ndim`; the lower face is sampled when
/// `edge_index < ndim`, the upper face otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Raw edge index as supplied by the caller, `0..2*ndim`.
    pub index: usize,
}

impl Edge {
    /// The axis this edge lies along.
    pub fn axis(&self, ndim: usize) -> usize {
        self.index % ndim
    }

    /// Whether this edge is the upper (rather than lower) face.
    pub fn is_upper(&self, ndim: usize) -> bool {
        self.index >= ndim
    }
}

/// Detector geometry: grid-stride downsampling plus an optional
/// boundary-slab or single-edge extraction.
#[derive(Clone, Debug)]
pub struct Detector {
    grid_shape: Vec<usize>,
    spatial_downsample: usize,
    boundary: usize,
    edge: Option<Edge>,
    downsample_shape: Vec<usize>,
}

impl Detector {
    /// Builds a detector over a grid of the given shape.
    ///
    /// `grid_shape` is `Grid::shape()` normally, or `Grid::full_shape()`
    /// when the detector is configured with `with_pml`.
    pub fn new(
        grid_shape: &[usize],
        spatial_downsample: usize,
        boundary: usize,
        edge: Option<usize>,
    ) -> Result<Self, DetectorError> {
        if spatial_downsample == 0 {
            return Err(DetectorError::ZeroStride { axis: 0 });
        }
        let ndim = grid_shape.len();
        let downsample_shape: Vec<usize> = grid_shape
            .iter()
            .map(|&n| n.div_ceil(spatial_downsample))
            .collect();

        let edge = edge.map(|index| Edge { index });

        if boundary > 0 && edge.is_none() && ndim > 1 {
            let all_equal = downsample_shape.windows(2).all(|w| w[0] == w[1]);
            if !all_equal {
                return Err(DetectorError::GeometryMismatch {
                    shape: downsample_shape.clone(),
                });
            }
        }

        Ok(Detector {
            grid_shape: grid_shape.to_vec(),
            spatial_downsample,
            boundary,
            edge,
            downsample_shape,
        })
    }

    /// Shape of the grid after striding by `spatial_downsample`, before
    /// any boundary/edge extraction.
    pub fn downsample_shape(&self) -> &[usize] {
        &self.downsample_shape
    }

    /// Boundary slab thickness, `0` for full-grid detectors.
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Final detected-sample shape (one element of `detected_wave`'s
    /// leading-axis-stripped shape).
    pub fn detected_shape(&self) -> Vec<usize> {
        let ndim = self.grid_shape.len();
        if self.boundary == 0 {
            return self.downsample_shape.clone();
        }
        let s_perp: Vec<usize> = if ndim == 1 {
            Vec::new()
        } else {
            self.downsample_shape[1..].to_vec()
        };
        match self.edge {
            Some(_) => {
                let mut shape = vec![self.boundary];
                shape.extend(s_perp);
                shape
            }
            None => {
                let mut shape = vec![2 * ndim * self.boundary];
                shape.extend(s_perp);
                shape
            }
        }
    }

    /// Strides `w` along every axis by `spatial_downsample`.
    pub fn downsample_grid(&self, w: &ArrayD<f64>) -> ArrayD<f64> {
        if self.spatial_downsample == 1 {
            return w.clone();
        }
        let ds = self.spatial_downsample;
        ArrayD::from_shape_fn(IxDyn(&self.downsample_shape), |idx| {
            let src: Vec<usize> = idx.slice().iter().map(|&i| i * ds).collect();
            w[IxDyn(&src)]
        })
    }

    /// Extracts the boundary/edge slab from an already grid-strided
    /// array of shape [`Self::downsample_shape`]. When `boundary == 0`
    /// this is the identity.
    pub fn sample(&self, w: &ArrayD<f64>) -> ArrayD<f64> {
        if self.boundary == 0 {
            return w.clone();
        }
        let ndim = self.downsample_shape.len();
        match self.edge {
            Some(edge) => self.sample_single_edge(w, edge, ndim),
            None => self.sample_full_boundary(w, ndim),
        }
    }

    fn sample_single_edge(&self, w: &ArrayD<f64>, edge: Edge, ndim: usize) -> ArrayD<f64> {
        let dim = edge.axis(ndim);
        let upper = edge.is_upper(ndim);
        let axis_len = self.downsample_shape[dim];
        let shape = self.detected_shape();
        ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
            let offset = idx[0];
            let coord_on_axis = if upper {
                axis_len - self.boundary + offset
            } else {
                offset
            };
            let src = self.scatter_perp_coords(idx.slice(), dim, coord_on_axis, ndim);
            w[IxDyn(&src)]
        })
    }

    fn sample_full_boundary(&self, w: &ArrayD<f64>, ndim: usize) -> ArrayD<f64> {
        let shape = self.detected_shape();
        ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
            let face_block = idx[0] / self.boundary;
            let offset = idx[0] % self.boundary;
            let dim = face_block / 2;
            let upper = face_block % 2 == 1;
            let axis_len = self.downsample_shape[dim];
            let coord_on_axis = if upper {
                axis_len - self.boundary + offset
            } else {
                offset
            };
            let src = self.scatter_perp_coords(idx.slice(), dim, coord_on_axis, ndim);
            w[IxDyn(&src)]
        })
    }

    /// Given the remaining (perpendicular) indices `idx[1..]`, rebuilds a
    /// full `ndim`-length coordinate with `coord_on_axis` inserted at
    /// position `dim` and the rest filled in order.
    fn scatter_perp_coords(&self, idx: &[usize], dim: usize, coord_on_axis: usize, ndim: usize) -> Vec<usize> {
        let mut src = vec![0usize; ndim];
        src[dim] = coord_on_axis;
        let mut perp_iter = idx[1..].iter();
        for (axis, slot) in src.iter_mut().enumerate() {
            if axis == dim {
                continue;
            }
            if let Some(&v) = perp_iter.next() {
                *slot = v;
            }
        }
        src
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn full_grid_detector_is_always_identity(len in 1usize..64) {
            let det = Detector::new(&[len], 1, 0, None).unwrap();
            let w = ArrayD::from_shape_fn(IxDyn(&[len]), |idx| idx[0] as f64);
            prop_assert_eq!(det.sample(&det.downsample_grid(&w)), w);
            prop_assert_eq!(det.downsample_shape(), &[len][..]);
        }
    }

    #[test]
    fn identity_when_full_grid() {
        let det = Detector::new(&[128], 1, 0, None).unwrap();
        assert_eq!(det.downsample_shape(), &[128]);
        assert_eq!(det.detected_shape(), vec![128]);
        let w = ArrayD::from_shape_fn(IxDyn(&[128]), |idx| idx[0] as f64);
        let sampled = det.sample(&det.downsample_grid(&w));
        assert_eq!(sampled, w);
    }

    #[test]
    fn one_d_full_boundary_shape() {
        let det = Detector::new(&[128], 1, 5, None).unwrap();
        assert_eq!(det.detected_shape(), vec![10]);
    }

    #[test]
    fn two_d_full_boundary_shape_and_equality_check() {
        let det = Detector::new(&[128, 128], 2, 1, None).unwrap();
        assert_eq!(det.detected_shape(), vec![4, 64]);
    }

    #[test]
    fn full_boundary_interleaves_lower_and_upper_per_axis() {
        // Face blocks along axis 0 must come out as
        // [axis0_lower, axis0_upper, axis1_lower, axis1_upper, ...],
        // not all lowers followed by all uppers.
        let det = Detector::new(&[4, 4], 1, 1, None).unwrap();
        let w = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| (idx[0] * 10 + idx[1]) as f64);
        let sampled = det.sample(&w);
        assert_eq!(sampled.shape(), &[4, 4]);

        // face 0: axis 0 lower (row 0)
        for j in 0..4 {
            assert_eq!(sampled[IxDyn(&[0, j])], w[IxDyn(&[0, j])]);
        }
        // face 1: axis 0 upper (row 3)
        for j in 0..4 {
            assert_eq!(sampled[IxDyn(&[1, j])], w[IxDyn(&[3, j])]);
        }
        // face 2: axis 1 lower (column 0)
        for i in 0..4 {
            assert_eq!(sampled[IxDyn(&[2, i])], w[IxDyn(&[i, 0])]);
        }
        // face 3: axis 1 upper (column 3)
        for i in 0..4 {
            assert_eq!(sampled[IxDyn(&[3, i])], w[IxDyn(&[i, 3])]);
        }
    }

    #[test]
    fn rejects_non_cubic_full_boundary() {
        let err = Detector::new(&[128, 64], 1, 1, None).unwrap_err();
        assert!(matches!(err, DetectorError::GeometryMismatch { .. }));
    }

    #[test]
    fn three_d_full_boundary_shape() {
        let det = Detector::new(&[32, 32, 32], 1, 5, None).unwrap();
        assert_eq!(det.detected_shape(), vec![30, 32, 32]);
    }

    #[test]
    fn single_edge_shape() {
        let det = Detector::new(&[128, 128], 2, 1, Some(0)).unwrap();
        assert_eq!(det.detected_shape(), vec![1, 64]);
    }

    #[test]
    fn single_edge_extracts_lower_face() {
        let det = Detector::new(&[4, 4], 1, 1, Some(0)).unwrap();
        let w = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| (idx[0] * 10 + idx[1]) as f64);
        let sampled = det.sample(&w);
        assert_eq!(sampled.shape(), &[1, 4]);
        for j in 0..4 {
            assert_eq!(sampled[IxDyn(&[0, j])], w[IxDyn(&[0, j])]);
        }
    }

    #[test]
    fn single_edge_extracts_upper_face() {
        let det = Detector::new(&[4, 4], 1, 1, Some(2)).unwrap();
        let w = ArrayD::from_shape_fn(IxDyn(&[4, 4]), |idx| (idx[0] * 10 + idx[1]) as f64);
        let sampled = det.sample(&w);
        for j in 0..4 {
            assert_eq!(sampled[IxDyn(&[0, j])], w[IxDyn(&[3, j])]);
        }
    }

    #[test]
    fn downsample_grid_strides() {
        let det = Detector::new(&[8], 2, 0, None).unwrap();
        let w = ArrayD::from_shape_fn(IxDyn(&[8]), |idx| idx[0] as f64);
        let ds = det.downsample_grid(&w);
        assert_eq!(ds.into_raw_vec(), vec![0.0, 2.0, 4.0, 6.0]);
    }
}
