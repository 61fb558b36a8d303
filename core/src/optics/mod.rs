pub mod aperture;
pub mod diffraction;
pub mod mtf;
pub mod psf;

pub use aperture::{Aperture, ApertureOverrides, DEFAULT_SAMPLE_SPACING, FULL_TRANSMITTANCE};
pub use mtf::MtfCurve;
pub use psf::{OpticalPsf, ProfileMinimum};
