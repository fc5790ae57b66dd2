use tracing::debug;

use crate::stereo_pipeline::common::error::{PipelineError, Result};
use crate::stereo_pipeline::raster::types::{DisparityField, GrayscaleImage};

/// A rectified image pair that passed validation: both images are non-empty
/// and share the same width and height.
#[derive(Debug)]
pub struct StereoPair {
    left: GrayscaleImage,
    right: GrayscaleImage,
}

impl StereoPair {
    /// Takes ownership of both images. On failure both buffers are dropped
    /// before the error reaches the caller.
    pub fn new(left: GrayscaleImage, right: GrayscaleImage) -> Result<Self> {
        if left.dimensions() != right.dimensions() {
            return Err(PipelineError::DimensionMismatch {
                left_width: left.width(),
                left_height: left.height(),
                right_width: right.width(),
                right_height: right.height(),
            });
        }

        if left.is_empty() {
            return Err(PipelineError::EmptyImage(left.width(), left.height()));
        }

        debug!("Validated stereo pair: {}x{}", left.width(), left.height());
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &GrayscaleImage {
        &self.left
    }

    pub fn right(&self) -> &GrayscaleImage {
        &self.right
    }

    pub fn width(&self) -> usize {
        self.left.width()
    }

    pub fn height(&self) -> usize {
        self.left.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.left.dimensions()
    }
}

/// Disparity fields for both reference views of one pair.
#[derive(Debug, Clone)]
pub struct DisparityPair {
    /// Indexed by left-image pixels; matches lie at `x - d` in the right image.
    pub left: DisparityField,
    /// Indexed by right-image pixels; matches lie at `x + d` in the left image.
    pub right: DisparityField,
}

impl DisparityPair {
    /// Checks the engine postcondition against the pair it was computed from.
    pub fn ensure_dimensions(&self, expected: (usize, usize)) -> Result<()> {
        for (view, field) in [("left", &self.left), ("right", &self.right)] {
            if field.dimensions() != expected {
                return Err(PipelineError::EngineContract(format!(
                    "{} disparity is {}x{}, expected {}x{}",
                    view,
                    field.width(),
                    field.height(),
                    expected.0,
                    expected.1
                )));
            }
        }
        Ok(())
    }
}
