//! Diffraction core for predicting the optical response of an imaging system.
//!
//! An [`Aperture`] describes the pupil as a transmittance grid; an
//! [`OpticalPsf`] propagates it to the focal plane with a 2D FFT and derives
//! the modulation transfer function from the resulting intensity.

pub mod interface;
pub mod math;
pub mod optics;
pub mod prelude;
pub mod telemetry;

pub use optics::{Aperture, ApertureOverrides, MtfCurve, OpticalPsf, ProfileMinimum};
pub use prelude::{OpticalConfig, OpticsError, OpticsResult};
