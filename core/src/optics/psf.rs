//! Fraunhofer propagation from a pupil grid to focal-plane intensity.
//!
//! The PSF is `|FFT2(pupil)|²` with the zero frequency moved to
//! `(rows / 2, cols / 2)`. For a pupil grid of `n` samples of spacing `dx`
//! the focal-plane step along that axis is `λ f / (n dx)`, so padding the
//! pupil with zeros refines the focal-plane sampling without changing the
//! pupil itself. The MTF is the magnitude of the FFT of the PSF, normalised
//! to one at zero frequency, with a frequency step of `dx / (λ f)`.

use crate::math::fft::{centered_axis, fftfreq, fftshift_2d, FftHelper};
use crate::math::stats::StatsHelper;
use crate::optics::aperture::Aperture;
use crate::optics::mtf::MtfCurve;
use crate::prelude::{GridIndex, OpticalConfig, OpticsError, OpticsResult};
use crate::telemetry::log::LogManager;
use ndarray::{s, Array1, Array2};

/// First dark ring found along the center row of a PSF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileMinimum {
    /// Sample offset from the center.
    pub index: usize,
    /// Focal-plane radius of that sample, in metres.
    pub radius: f64,
    /// Zero of the signed amplitude fitted around the sample.
    pub refined_radius: f64,
}

/// Focal-plane intensity of a point source imaged through an aperture.
#[derive(Debug, Clone)]
pub struct OpticalPsf {
    array: Array2<f64>,
    sampling: Array1<f64>,
    row_sampling: Array1<f64>,
    center: GridIndex,
    step: (f64, f64),
    config: OpticalConfig,
}

impl OpticalPsf {
    /// Propagates `aperture` to the focal plane of a system with the given
    /// wavelength and focal length, both in metres.
    pub fn from_aperture(
        aperture: &Aperture,
        wavelength: f64,
        focal_length: f64,
    ) -> OpticsResult<Self> {
        let config = OpticalConfig::new(wavelength, focal_length)?;
        let logger = LogManager::new("psf");
        let (rows, cols) = aperture.shape();

        let mut fft = FftHelper::new((rows, cols));
        let field = fft.forward_real(aperture.array())?;
        let array = fftshift_2d(&field.mapv(|value| value.norm_sqr()));

        let scale = config.wavelength_focal_product() / aperture.sample_spacing();
        let step = (scale / rows as f64, scale / cols as f64);
        let psf = Self {
            array,
            sampling: centered_axis(cols, step.1),
            row_sampling: centered_axis(rows, step.0),
            center: (rows / 2, cols / 2),
            step,
            config,
        };

        logger.record(&format!(
            "PSF {}x{} at {:.1} nm, focal-plane step {:.4e} m",
            rows,
            cols,
            wavelength * 1e9,
            step.1
        ));
        Ok(psf)
    }

    /// Focal-plane intensity, DC-centered. Not normalised.
    pub fn array(&self) -> &Array2<f64> {
        &self.array
    }

    /// Focal-plane position of every column, in metres.
    pub fn sampling(&self) -> &Array1<f64> {
        &self.sampling
    }

    /// Focal-plane position of every row, in metres.
    pub fn row_sampling(&self) -> &Array1<f64> {
        &self.row_sampling
    }

    /// Index of the optical axis (zero position) in [`Self::array`].
    pub fn get_center(&self) -> GridIndex {
        self.center
    }

    /// Focal-plane step along (rows, cols), in metres.
    pub fn sample_step(&self) -> (f64, f64) {
        self.step
    }

    pub fn wavelength(&self) -> f64 {
        self.config.wavelength
    }

    pub fn focal_length(&self) -> f64 {
        self.config.focal_length
    }

    pub fn peak(&self) -> f64 {
        self.array.fold(0.0, |acc, &value| acc.max(value))
    }

    /// Modulation transfer function along the center row, from zero
    /// frequency outward: (frequencies in cycles per metre, modulation).
    pub fn mtf(&self) -> OpticsResult<(Array1<f64>, Array1<f64>)> {
        let mtf = self.mtf_2d()?;
        let (row, col) = self.center;
        let values = mtf.slice(s![row, col..]).to_owned();
        // The first ceil(n / 2) entries of fftfreq are the non-negative
        // frequencies, which is exactly the span from the center outward.
        let sampling = fftfreq(self.array.ncols(), self.step.1)?
            .slice(s![..values.len()])
            .to_owned();
        Ok((sampling, values))
    }

    pub fn mtf_curve(&self) -> OpticsResult<MtfCurve> {
        let (sampling, values) = self.mtf()?;
        Ok(MtfCurve::new(sampling, values))
    }

    /// Full 2D MTF, DC-centered at [`Self::get_center`] and equal to one
    /// there.
    pub fn mtf_2d(&self) -> OpticsResult<Array2<f64>> {
        let (rows, cols) = self.array.dim();
        if rows < 2 || cols < 2 {
            return Err(OpticsError::InsufficientSamples(format!(
                "MTF needs at least 2 samples per axis, PSF has shape {:?}",
                (rows, cols)
            )));
        }

        let mut fft = FftHelper::new((rows, cols));
        let otf = fft.forward_real(&self.array)?;
        let magnitude = fftshift_2d(&otf.mapv(|value| value.norm()));
        let dc = magnitude[self.center];
        if dc <= 0.0 || !dc.is_finite() {
            return Err(OpticsError::InsufficientSamples(
                "PSF carries no energy".into(),
            ));
        }
        LogManager::new("psf").detail(&format!("OTF DC magnitude {:.4e}", dc));
        Ok(magnitude / dc)
    }

    /// Center-row positions and intensities from the optical axis outward.
    pub fn radial_profile(&self) -> (Array1<f64>, Array1<f64>) {
        let (row, col) = self.center;
        (
            self.sampling.slice(s![col..]).to_owned(),
            self.array.slice(s![row, col..]).to_owned(),
        )
    }

    /// First dark ring along the center row: the first sample whose
    /// successor is not lower. `None` when the profile keeps falling until
    /// the grid edge, which means the focal plane is not sampled far enough.
    pub fn first_minimum(&self) -> Option<ProfileMinimum> {
        let (positions, intensities) = self.radial_profile();
        let values = intensities.as_slice()?;
        let index = StatsHelper::first_rising_index(values)?;
        let radius = positions[index];

        let refined_radius = if index > 0 && index + 2 < values.len() {
            let offset = StatsHelper::zero_crossing([
                values[index - 1],
                values[index],
                values[index + 1],
                values[index + 2],
            ]);
            radius + offset * self.step.1
        } else {
            radius
        };

        Some(ProfileMinimum {
            index,
            radius,
            refined_radius,
        })
    }

    /// Fraction of the total intensity within `radius` metres of the axis.
    /// Zero for a dark PSF.
    pub fn encircled_energy(&self, radius: f64) -> f64 {
        let total = self.array.sum();
        if total <= 0.0 {
            return 0.0;
        }

        let limit = radius * radius;
        let inside: f64 = self
            .array
            .indexed_iter()
            .filter(|((i, j), _)| {
                let y = self.row_sampling[*i];
                let x = self.sampling[*j];
                x * x + y * y <= limit
            })
            .map(|(_, &value)| value)
            .sum();
        inside / total
    }
}
