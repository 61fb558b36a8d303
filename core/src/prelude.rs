use serde::{Deserialize, Serialize};

/// Row/column index into a 2D grid.
pub type GridIndex = (usize, usize);

/// Wavelength and focal length of the imaging system, both in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalConfig {
    pub wavelength: f64,
    pub focal_length: f64,
}

impl OpticalConfig {
    pub fn new(wavelength: f64, focal_length: f64) -> OpticsResult<Self> {
        let config = Self {
            wavelength,
            focal_length,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects non-physical (non-positive or non-finite) values.
    pub fn validate(&self) -> OpticsResult<()> {
        ensure_positive("wavelength", self.wavelength)?;
        ensure_positive("focal length", self.focal_length)
    }

    /// Product `λ·f` that scales every pupil/focal-plane conversion.
    pub fn wavelength_focal_product(&self) -> f64 {
        self.wavelength * self.focal_length
    }
}

/// Error taxonomy shared by the aperture and PSF components.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OpticsError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("index {index:?} out of bounds for grid of shape {shape:?}")]
    IndexOutOfBounds { index: GridIndex, shape: GridIndex },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("insufficient samples: {0}")]
    InsufficientSamples(String),
}

pub type OpticsResult<T> = Result<T, OpticsError>;

pub(crate) fn ensure_positive(name: &str, value: f64) -> OpticsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OpticsError::InvalidParameter(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}
