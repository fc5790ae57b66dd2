use crate::stereo_pipeline::raster::{ColorRaster, NormalizedIntensity};
use crate::stereo_pipeline::visualize::palette::TURBO_PALETTE;

/// Maps 8-bit intensities to color triplets through a fixed 256-entry palette.
///
/// Each pixel is looked up on its own; neighbours never influence the result.
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    palette: &'static [[u8; 3]; 256],
}

impl Colorizer {
    pub fn turbo() -> Self {
        Self { palette: &TURBO_PALETTE }
    }

    pub fn color_of(&self, intensity: u8) -> [u8; 3] {
        self.palette[intensity as usize]
    }

    pub fn colorize(&self, intensity: &NormalizedIntensity) -> ColorRaster {
        intensity.map(|&v| self.color_of(v))
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::turbo()
    }
}
