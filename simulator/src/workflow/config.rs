use anyhow::Context;
use psfcore::optics::DEFAULT_SAMPLE_SPACING;
use psfcore::OpticalConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MTF_THRESHOLD: f64 = 1e-5;

/// Pupil description, in grid samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApertureConfig {
    pub radius: f64,
    #[serde(default)]
    pub obstruction_radius: f64,
    /// Side of the square disk grid before padding; derived from the
    /// radius when absent.
    #[serde(default)]
    pub grid_size: Option<usize>,
    /// Zero samples added on every side.
    #[serde(default)]
    pub padding: usize,
    #[serde(default = "default_sample_spacing")]
    pub sample_spacing: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub aperture: ApertureConfig,
    pub optics: OpticalConfig,
    /// Detector pixel pitch in metres, for cycles-per-pixel figures.
    #[serde(default)]
    pub pixel_pitch: Option<f64>,
    #[serde(default = "default_mtf_threshold")]
    pub mtf_threshold: f64,
}

fn default_sample_spacing() -> f64 {
    DEFAULT_SAMPLE_SPACING
}

fn default_mtf_threshold() -> f64 {
    DEFAULT_MTF_THRESHOLD
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(aperture: ApertureConfig, wavelength: f64, focal_length: f64) -> Self {
        Self {
            aperture,
            optics: OpticalConfig {
                wavelength,
                focal_length,
            },
            pixel_pitch: None,
            mtf_threshold: DEFAULT_MTF_THRESHOLD,
        }
    }

    pub fn with_pixel_pitch(mut self, pixel_pitch: Option<f64>) -> Self {
        self.pixel_pitch = pixel_pitch;
        self
    }

    pub fn with_mtf_threshold(mut self, mtf_threshold: f64) -> Self {
        self.mtf_threshold = mtf_threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_uses_defaults() {
        let aperture = ApertureConfig {
            radius: 12.0,
            obstruction_radius: 0.0,
            grid_size: None,
            padding: 20,
            sample_spacing: DEFAULT_SAMPLE_SPACING,
        };
        let cfg = WorkflowConfig::from_args(aperture, 800e-9, 91e-3).with_pixel_pitch(Some(4.5e-6));
        assert_eq!(cfg.optics.focal_length, 91e-3);
        assert_eq!(cfg.pixel_pitch, Some(4.5e-6));
        assert_eq!(cfg.mtf_threshold, DEFAULT_MTF_THRESHOLD);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"aperture:\n  radius: 175\n  padding: 402\noptics:\n  wavelength: 5.6e-7\n  focal_length: 2.1\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.aperture.radius, 175.0);
        assert_eq!(cfg.aperture.padding, 402);
        assert_eq!(cfg.aperture.grid_size, None);
        assert_eq!(cfg.aperture.sample_spacing, DEFAULT_SAMPLE_SPACING);
        assert_eq!(cfg.optics.wavelength, 5.6e-7);
        assert_eq!(cfg.pixel_pitch, None);
        assert_eq!(cfg.mtf_threshold, DEFAULT_MTF_THRESHOLD);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
