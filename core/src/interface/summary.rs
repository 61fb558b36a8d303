use crate::optics::diffraction::{airy_first_minimum, cutoff_frequency};
use crate::optics::{Aperture, MtfCurve, OpticalPsf};
use serde::{Deserialize, Serialize};

/// One center-row sample of a PSF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    pub position: f64,
    pub intensity: f64,
}

impl ProfileSample {
    /// Center-row profile from the axis outward, normalised to the peak.
    pub fn from_psf(psf: &OpticalPsf) -> Vec<Self> {
        let (positions, intensities) = psf.radial_profile();
        let peak = psf.peak();
        let scale = if peak > 0.0 { 1.0 / peak } else { 0.0 };
        positions
            .iter()
            .zip(intensities.iter())
            .map(|(&position, &intensity)| Self {
                position,
                intensity: intensity * scale,
            })
            .collect()
    }
}

/// One sample of a one-sided MTF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MtfSample {
    pub frequency: f64,
    pub modulation: f64,
}

impl MtfSample {
    pub fn from_curve(curve: &MtfCurve) -> Vec<Self> {
        curve
            .sampling
            .iter()
            .zip(curve.values.iter())
            .map(|(&frequency, &modulation)| Self {
                frequency,
                modulation,
            })
            .collect()
    }
}

/// Measured and analytic figures of merit for one propagated aperture.
///
/// Lengths in metres, frequencies in cycles per metre; `*_cycles_per_pixel`
/// fields are present only when a pixel pitch was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsfSummary {
    pub grid_shape: (usize, usize),
    pub wavelength: f64,
    pub focal_length: f64,
    pub aperture_diameter: f64,
    pub focal_plane_step: f64,
    pub first_minimum: Option<f64>,
    pub refined_first_minimum: Option<f64>,
    pub theoretical_first_minimum: f64,
    pub encircled_energy_first_ring: Option<f64>,
    pub mtf_threshold: f64,
    pub mtf_cutoff: Option<f64>,
    pub theoretical_cutoff: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtf_cutoff_cycles_per_pixel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theoretical_cutoff_cycles_per_pixel: Option<f64>,
}

impl PsfSummary {
    pub fn new(
        aperture: &Aperture,
        psf: &OpticalPsf,
        curve: &MtfCurve,
        mtf_threshold: f64,
        pixel_pitch: Option<f64>,
    ) -> Self {
        let diameter = 2.0 * aperture.physical_radius();
        let minimum = psf.first_minimum();
        let mtf_cutoff = curve.cutoff(mtf_threshold);
        let theoretical_cutoff = cutoff_frequency(psf.wavelength(), psf.focal_length(), diameter);

        Self {
            grid_shape: psf.array().dim(),
            wavelength: psf.wavelength(),
            focal_length: psf.focal_length(),
            aperture_diameter: diameter,
            focal_plane_step: psf.sample_step().1,
            first_minimum: minimum.map(|found| found.radius),
            refined_first_minimum: minimum.map(|found| found.refined_radius),
            theoretical_first_minimum: airy_first_minimum(
                psf.wavelength(),
                psf.focal_length(),
                diameter,
            ),
            encircled_energy_first_ring: minimum
                .map(|found| psf.encircled_energy(found.refined_radius)),
            mtf_threshold,
            mtf_cutoff,
            theoretical_cutoff,
            pixel_pitch,
            mtf_cutoff_cycles_per_pixel: pixel_pitch.and_then(|pitch| {
                let axis = curve.in_cycles_per_pixel(pitch);
                curve.cutoff_index(mtf_threshold).map(|index| axis[index])
            }),
            theoretical_cutoff_cycles_per_pixel: pixel_pitch
                .map(|pitch| theoretical_cutoff * pitch),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn propagate() -> (Aperture, OpticalPsf, MtfCurve) {
        let aperture = Aperture::disk(8.0, 0.0, None).unwrap().add_padding(30).unwrap();
        let psf = OpticalPsf::from_aperture(&aperture, 600e-9, 0.2).unwrap();
        let curve = psf.mtf_curve().unwrap();
        (aperture, psf, curve)
    }

    #[test]
    fn summary_reports_measured_and_analytic_values() {
        let (aperture, psf, curve) = propagate();
        let summary = PsfSummary::new(&aperture, &psf, &curve, 1e-5, Some(5e-6));

        assert_eq!(summary.grid_shape, (77, 77));
        assert!((summary.aperture_diameter - 0.016).abs() < 1e-15);
        assert!(summary.first_minimum.is_some());
        assert!(summary.mtf_cutoff.is_some());
        let pixel_cutoff = summary.mtf_cutoff_cycles_per_pixel.unwrap();
        let analytic = summary.theoretical_cutoff_cycles_per_pixel.unwrap();
        assert!((pixel_cutoff - analytic).abs() < 0.1 * analytic);

        let index = curve.cutoff_index(1e-5).unwrap();
        assert_eq!(pixel_cutoff, curve.in_cycles_per_pixel(5e-6)[index]);
    }

    #[test]
    fn summary_serialises_without_pixel_fields() {
        let (aperture, psf, curve) = propagate();
        let summary = PsfSummary::new(&aperture, &psf, &curve, 1e-5, None);
        let json = summary.to_json().unwrap();
        assert!(json.contains("theoretical_first_minimum"));
        assert!(!json.contains("pixel_pitch"));

        let parsed: PsfSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.grid_shape, summary.grid_shape);
        assert_eq!(parsed.pixel_pitch, None);
    }

    #[test]
    fn profile_is_peak_normalised() {
        let (_, psf, curve) = propagate();
        let profile = ProfileSample::from_psf(&psf);
        assert_eq!(profile[0].position, 0.0);
        assert!((profile[0].intensity - 1.0).abs() < 1e-12);
        let samples = MtfSample::from_curve(&curve);
        assert_eq!(samples.len(), curve.len());
        assert!((samples[0].modulation - 1.0).abs() < 1e-12);
    }
}
