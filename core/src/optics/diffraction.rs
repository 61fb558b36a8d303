//! Closed-form references for a clear circular pupil.
//!
//! Lengths are in metres and frequencies in cycles per metre at the focal
//! plane. Inputs are expected to be positive.

use std::f64::consts::PI;

/// Airy pattern first dark ring: `r = 1.22 λ f / D`.
pub const AIRY_FIRST_MINIMUM_FACTOR: f64 = 1.22;

pub fn airy_first_minimum(wavelength: f64, focal_length: f64, diameter: f64) -> f64 {
    AIRY_FIRST_MINIMUM_FACTOR * wavelength * focal_length / diameter
}

/// Incoherent cutoff frequency `D / (λ f)` beyond which the MTF vanishes.
pub fn cutoff_frequency(wavelength: f64, focal_length: f64, diameter: f64) -> f64 {
    diameter / (wavelength * focal_length)
}

pub fn f_number(focal_length: f64, diameter: f64) -> f64 {
    focal_length / diameter
}

/// MTF of an unobstructed circular pupil at `normalized_frequency = ν / ν_c`.
///
/// ```text
/// MTF(x) = (2/π) (acos x − x √(1 − x²)),  0 ≤ x ≤ 1
/// ```
pub fn diffraction_limited_mtf(normalized_frequency: f64) -> f64 {
    let x = normalized_frequency.abs();
    if x >= 1.0 {
        return 0.0;
    }
    (2.0 / PI) * (x.acos() - x * (1.0 - x * x).sqrt())
}
