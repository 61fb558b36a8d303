use crate::workflow::config::ApertureConfig;
use anyhow::Context;
use psfcore::Aperture;

/// Builds the padded pupil grid described by `config`.
pub fn build_aperture(config: &ApertureConfig) -> anyhow::Result<Aperture> {
    let disk = Aperture::disk(config.radius, config.obstruction_radius, config.grid_size)
        .with_context(|| format!("building disk aperture of radius {}", config.radius))?;
    let aperture = disk
        .add_padding(config.padding)
        .with_context(|| format!("padding aperture by {} samples", config.padding))?
        .with_sample_spacing(config.sample_spacing)
        .context("applying aperture sample spacing")?;

    log::debug!(
        "aperture grid {:?}, open fraction {:.3}",
        aperture.shape(),
        aperture.open_fraction()
    );
    Ok(aperture)
}
