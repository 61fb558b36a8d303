use crate::math::stats::StatsHelper;
use ndarray::Array1;

/// One-sided modulation transfer function: modulation against spatial
/// frequency in cycles per metre, starting at zero frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct MtfCurve {
    pub sampling: Array1<f64>,
    pub values: Array1<f64>,
}

impl MtfCurve {
    pub fn new(sampling: Array1<f64>, values: Array1<f64>) -> Self {
        Self { sampling, values }
    }

    /// Index of the first sample whose modulation drops below `threshold`.
    pub fn cutoff_index(&self, threshold: f64) -> Option<usize> {
        self.values
            .as_slice()
            .and_then(|values| StatsHelper::first_below(values, threshold))
    }

    /// Frequency of the first sample below `threshold`. `None` when the
    /// curve never gets there inside the sampled band.
    pub fn cutoff(&self, threshold: f64) -> Option<f64> {
        self.cutoff_index(threshold).map(|index| self.sampling[index])
    }

    /// Frequency axis in cycles per pixel for a detector of `pixel_pitch`
    /// metres.
    pub fn in_cycles_per_pixel(&self, pixel_pitch: f64) -> Array1<f64> {
        &self.sampling * pixel_pitch
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_curve() -> MtfCurve {
        MtfCurve::new(
            array![0.0, 100.0, 200.0, 300.0],
            array![1.0, 0.4, 1e-6, 0.0],
        )
    }

    #[test]
    fn cutoff_reports_first_frequency_below_threshold() {
        let curve = sample_curve();
        assert_eq!(curve.cutoff_index(1e-5), Some(2));
        assert_eq!(curve.cutoff(1e-5), Some(200.0));
        assert_eq!(curve.cutoff(-1.0), None);
    }

    #[test]
    fn pixel_pitch_converts_frequency_axis() {
        let axis = sample_curve().in_cycles_per_pixel(0.25);
        assert_eq!(axis.to_vec(), vec![0.0, 25.0, 50.0, 75.0]);
    }
}
