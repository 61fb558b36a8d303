use crate::prelude::{ensure_positive, OpticsError, OpticsResult};
use ndarray::{Array1, Array2, Axis};
use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for 2D grids of a fixed shape.
///
/// Transforms are unnormalised and leave the zero frequency at index (0, 0);
/// use [`fftshift_2d`] to move it to the grid center.
pub struct FftHelper {
    shape: (usize, usize),
    along_rows: Arc<dyn Fft<f64>>,
    along_cols: Arc<dyn Fft<f64>>,
    lane: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn new(shape: (usize, usize)) -> Self {
        let mut planner = FftPlanner::new();
        // Each row holds `cols` samples, each column `rows` samples.
        let along_rows = planner.plan_fft_forward(shape.1);
        let along_cols = planner.plan_fft_forward(shape.0);
        let scratch_len = along_rows
            .get_inplace_scratch_len()
            .max(along_cols.get_inplace_scratch_len());
        Self {
            shape,
            along_rows,
            along_cols,
            lane: vec![Complex64::zero(); shape.0.max(shape.1)],
            scratch: vec![Complex64::zero(); scratch_len],
        }
    }

    pub fn forward(&mut self, input: &Array2<Complex64>) -> OpticsResult<Array2<Complex64>> {
        if input.dim() != self.shape {
            return Err(OpticsError::InvalidGeometry(format!(
                "FFT planned for {:?}, got grid of shape {:?}",
                self.shape,
                input.dim()
            )));
        }

        let mut output = input.clone();
        transform_lanes(
            &mut output,
            Axis(0),
            self.along_rows.as_ref(),
            &mut self.lane,
            &mut self.scratch,
        );
        transform_lanes(
            &mut output,
            Axis(1),
            self.along_cols.as_ref(),
            &mut self.lane,
            &mut self.scratch,
        );
        Ok(output)
    }

    pub fn forward_real(&mut self, input: &Array2<f64>) -> OpticsResult<Array2<Complex64>> {
        let complex = input.mapv(|value| Complex64::new(value, 0.0));
        self.forward(&complex)
    }
}

// Iterating along `axis` yields the lanes that run across the other axis.
fn transform_lanes(
    data: &mut Array2<Complex64>,
    axis: Axis,
    fft: &dyn Fft<f64>,
    lane: &mut [Complex64],
    scratch: &mut [Complex64],
) {
    let len = fft.len();
    let buffer = &mut lane[..len];
    for mut view in data.axis_iter_mut(axis) {
        for (slot, value) in buffer.iter_mut().zip(view.iter()) {
            *slot = *value;
        }
        fft.process_with_scratch(buffer, scratch);
        for (value, slot) in view.iter_mut().zip(buffer.iter()) {
            *value = *slot;
        }
    }
}

/// Moves the zero-frequency sample from index 0 to index `n / 2` on both axes.
///
/// Follows the NumPy convention, so for odd `n` the center is `(n - 1) / 2`.
pub fn fftshift_2d<T: Clone>(input: &Array2<T>) -> Array2<T> {
    let (rows, cols) = input.dim();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        input[((i + rows - rows / 2) % rows, (j + cols - cols / 2) % cols)].clone()
    })
}

/// Inverse of [`fftshift_2d`].
pub fn ifftshift_2d<T: Clone>(input: &Array2<T>) -> Array2<T> {
    let (rows, cols) = input.dim();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        input[((i + rows / 2) % rows, (j + cols / 2) % cols)].clone()
    })
}

/// Sample frequencies of a length-`n` transform with the given sample spacing.
pub fn fftfreq(n: usize, sample_spacing: f64) -> OpticsResult<Array1<f64>> {
    if n == 0 {
        return Err(OpticsError::InsufficientSamples(
            "frequency axis needs at least one sample".into(),
        ));
    }
    ensure_positive("sample spacing", sample_spacing)?;

    let scale = 1.0 / (n as f64 * sample_spacing);
    let split = (n + 1) / 2;
    Ok(Array1::from_shape_fn(n, |idx| {
        if idx < split {
            idx as f64 * scale
        } else {
            -((n - idx) as f64) * scale
        }
    }))
}

/// Physical positions of a DC-centered axis: index `n / 2` maps to zero.
pub fn centered_axis(n: usize, step: f64) -> Array1<f64> {
    let center = (n / 2) as f64;
    Array1::from_shape_fn(n, |idx| (idx as f64 - center) * step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn fft_helper_returns_same_shape() {
        let mut helper = FftHelper::new((3, 4));
        let output = helper.forward_real(&Array2::zeros((3, 4))).unwrap();
        assert_eq!(output.dim(), (3, 4));
    }

    #[test]
    fn fft_helper_rejects_other_shapes() {
        let mut helper = FftHelper::new((4, 4));
        assert!(matches!(
            helper.forward_real(&Array2::zeros((4, 5))),
            Err(OpticsError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn constant_grid_transforms_to_centered_dc() {
        let mut helper = FftHelper::new((5, 4));
        let spectrum = helper.forward_real(&Array2::from_elem((5, 4), 1.0)).unwrap();
        let magnitude = fftshift_2d(&spectrum.mapv(|c| c.norm()));

        for ((i, j), &value) in magnitude.indexed_iter() {
            if (i, j) == (2, 2) {
                assert_abs_diff_eq!(value, 20.0, epsilon = 1e-12);
            } else {
                assert_abs_diff_eq!(value, 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn impulse_transforms_to_flat_spectrum() {
        let mut grid = Array2::zeros((4, 4));
        grid[(0, 0)] = 1.0;
        let mut helper = FftHelper::new((4, 4));
        let spectrum = helper.forward_real(&grid).unwrap();
        for value in spectrum.iter() {
            assert_abs_diff_eq!(value.re, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(value.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn symmetric_input_gives_symmetric_shifted_magnitude() {
        let mut grid = Array2::zeros((9, 9));
        for i in 3..6 {
            for j in 2..7 {
                grid[(i, j)] = 1.0;
            }
        }
        let mut helper = FftHelper::new((9, 9));
        let magnitude = fftshift_2d(&helper.forward_real(&grid).unwrap().mapv(|c| c.norm()));

        let center = 4;
        assert_abs_diff_eq!(magnitude[(center, center)], 15.0, epsilon = 1e-12);
        for k in 1..=center {
            assert_abs_diff_eq!(
                magnitude[(center, center + k)],
                magnitude[(center, center - k)],
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(
                magnitude[(center + k, center)],
                magnitude[(center - k, center)],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn fftshift_follows_numpy_for_odd_and_even_lengths() {
        let odd = array![[0, 1, 2, 3, 4]];
        assert_eq!(fftshift_2d(&odd), array![[3, 4, 0, 1, 2]]);
        let even = array![[0, 1, 2, 3]];
        assert_eq!(fftshift_2d(&even), array![[2, 3, 0, 1]]);

        let grid = Array2::from_shape_fn((5, 6), |(i, j)| i * 10 + j);
        assert_eq!(ifftshift_2d(&fftshift_2d(&grid)), grid);
    }

    #[test]
    fn fftfreq_matches_expected_ordering() {
        let freqs = fftfreq(8, 1.0).unwrap();
        assert_eq!(
            freqs.to_vec(),
            vec![0.0, 0.125, 0.25, 0.375, -0.5, -0.375, -0.25, -0.125]
        );
        assert!(fftfreq(0, 1.0).is_err());
        assert!(matches!(
            fftfreq(4, 0.0),
            Err(OpticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn centered_axis_is_zero_at_half_length() {
        let axis = centered_axis(5, 0.5);
        assert_eq!(axis.to_vec(), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        let even = centered_axis(4, 1.0);
        assert_eq!(even[2], 0.0);
    }
}
