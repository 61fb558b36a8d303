use crate::generator::aperture::build_aperture;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use psfcore::interface::{MtfSample, ProfileSample, PsfSummary};
use psfcore::OpticalPsf;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub summary: PsfSummary,
    pub profile: Vec<ProfileSample>,
    pub mtf: Vec<MtfSample>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let optics = self.config.optics;
        optics.validate().context("validating optical configuration")?;

        let aperture = build_aperture(&self.config.aperture).context("preparing aperture")?;
        let psf = OpticalPsf::from_aperture(&aperture, optics.wavelength, optics.focal_length)
            .context("propagating aperture to the focal plane")?;
        let curve = psf.mtf_curve().context("computing MTF")?;

        let summary = PsfSummary::new(
            &aperture,
            &psf,
            &curve,
            self.config.mtf_threshold,
            self.config.pixel_pitch,
        );
        if summary.first_minimum.is_none() {
            log::warn!("no dark ring inside the focal plane; increase aperture padding");
        }
        if summary.mtf_cutoff.is_none() {
            log::warn!(
                "MTF stays above {:e} across the sampled band",
                self.config.mtf_threshold
            );
        }

        Ok(WorkflowResult {
            profile: ProfileSample::from_psf(&psf),
            mtf: MtfSample::from_curve(&curve),
            summary,
        })
    }
}
