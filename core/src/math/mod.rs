pub mod fft;
pub mod stats;

pub use fft::{centered_axis, fftfreq, fftshift_2d, ifftshift_2d, FftHelper};
pub use stats::StatsHelper;
