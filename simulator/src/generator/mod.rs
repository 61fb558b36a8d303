pub mod aperture;
