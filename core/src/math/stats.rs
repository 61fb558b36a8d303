/// Searches over sampled 1D data.
pub struct StatsHelper;

impl StatsHelper {
    /// First index whose successor is not lower, i.e. where the forward
    /// difference becomes non-negative. A local minimum for data that starts
    /// out decreasing.
    pub fn first_rising_index(samples: &[f64]) -> Option<usize> {
        samples.windows(2).position(|pair| pair[1] >= pair[0])
    }

    /// First index whose value drops strictly below `threshold`.
    pub fn first_below(samples: &[f64], threshold: f64) -> Option<usize> {
        samples.iter().position(|&value| value < threshold)
    }

    /// Sub-sample offset, relative to `intensities[1]`, of the zero of an
    /// intensity sampled at four equally spaced points around a dark ring.
    ///
    /// The amplitude `sqrt(I)` changes sign once, between the middle sample
    /// and one of its neighbours. A parabola is fitted to the signed
    /// amplitudes for both placements; the one that better predicts the
    /// fourth sample wins and its root nearest the middle is returned,
    /// clamped to one sample either way.
    pub fn zero_crossing(intensities: [f64; 4]) -> f64 {
        let [before, middle, after, beyond] = intensities.map(|value| value.max(0.0).sqrt());
        [middle, -middle]
            .into_iter()
            .map(|signed| Parabola::through(before, signed, -after))
            .min_by(|a, b| a.misfit(2.0, -beyond).total_cmp(&b.misfit(2.0, -beyond)))
            .map_or(0.0, |parabola| parabola.nearest_root().clamp(-1.0, 1.0))
    }
}

/// `curvature x² + slope x + offset` through samples at x = -1, 0, 1.
struct Parabola {
    curvature: f64,
    slope: f64,
    offset: f64,
}

impl Parabola {
    fn through(before: f64, middle: f64, after: f64) -> Self {
        Self {
            curvature: 0.5 * (before + after) - middle,
            slope: 0.5 * (after - before),
            offset: middle,
        }
    }

    fn misfit(&self, x: f64, observed: f64) -> f64 {
        (self.curvature * x * x + self.slope * x + self.offset - observed).abs()
    }

    fn nearest_root(&self) -> f64 {
        let scale = self.slope.abs() + self.offset.abs();
        if self.curvature.abs() <= f64::EPSILON * scale {
            return if self.slope == 0.0 {
                0.0
            } else {
                -self.offset / self.slope
            };
        }

        let discriminant = self.slope * self.slope - 4.0 * self.curvature * self.offset;
        if discriminant < 0.0 {
            return -self.slope / (2.0 * self.curvature);
        }
        let q = -0.5 * (self.slope + self.slope.signum() * discriminant.sqrt());
        if q == 0.0 {
            return 0.0;
        }
        let (first, second) = (q / self.curvature, self.offset / q);
        if first.abs() <= second.abs() {
            first
        } else {
            second
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn first_rising_index_finds_local_minimum() {
        assert_eq!(
            StatsHelper::first_rising_index(&[5.0, 3.0, 1.0, 0.5, 2.0]),
            Some(3)
        );
        assert_eq!(StatsHelper::first_rising_index(&[2.0, 2.0]), Some(0));
    }

    #[test]
    fn first_rising_index_reports_missing_minimum() {
        assert_eq!(StatsHelper::first_rising_index(&[4.0, 3.0, 2.0]), None);
        assert_eq!(StatsHelper::first_rising_index(&[1.0]), None);
        assert_eq!(StatsHelper::first_rising_index(&[]), None);
    }

    #[test]
    fn first_below_is_strict() {
        let samples = [1.0, 0.5, 1e-5, 1e-6];
        assert_eq!(StatsHelper::first_below(&samples, 1e-5), Some(3));
        assert_eq!(StatsHelper::first_below(&samples, 1e-9), None);
    }

    #[test]
    fn zero_crossing_recovers_linear_amplitude() {
        // I = (x - 0.3)^2 sampled at x = -1, 0, 1, 2
        let offset = StatsHelper::zero_crossing([1.69, 0.09, 0.49, 2.89]);
        assert_abs_diff_eq!(offset, 0.3, epsilon = 1e-12);

        // I = (x + 0.2)^2, zero before the middle sample
        let offset = StatsHelper::zero_crossing([0.64, 0.04, 1.44, 4.84]);
        assert_abs_diff_eq!(offset, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn zero_crossing_handles_curved_amplitude() {
        // a(x) = (x - 0.1)(x - 4): steep on one side, flat on the other.
        let amplitude = |x: f64| (x - 0.1) * (x - 4.0);
        let samples = [-1.0, 0.0, 1.0, 2.0].map(|x: f64| amplitude(x).powi(2));
        let offset = StatsHelper::zero_crossing(samples);
        assert_abs_diff_eq!(offset, 0.1, epsilon = 1e-12);
    }
}
