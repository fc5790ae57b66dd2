//! Grayscale reader implementation using the image library.
//!
//! The container format is sniffed from the leading bytes, so PNG, JPEG, PGM,
//! BMP and TIFF inputs are all accepted. Color inputs are converted to 8-bit
//! luma the same way any viewer would display them in grayscale.

use tracing::debug;

use crate::stereo_pipeline::common::error::{PipelineError, Result};
use crate::stereo_pipeline::loader::reader::GrayscaleReader;
use crate::stereo_pipeline::raster::{GrayscaleImage, Raster};

/// Grayscale reader backed by the `image` crate's decoders.
pub struct DecodingReader;

impl GrayscaleReader for DecodingReader {
    /// Decodes an encoded image into a [`GrayscaleImage`].
    ///
    /// # Errors
    ///
    /// * [`PipelineError::DecodeError`] - empty input or bytes no decoder accepts
    /// * [`PipelineError::EmptyImage`] - the decoder produced a zero-sized image
    fn read_gray(&self, data: &[u8]) -> Result<GrayscaleImage> {
        debug!("Decoding input image, {} bytes", data.len());

        if data.is_empty() {
            return Err(PipelineError::DecodeError("input is empty".to_string()));
        }

        let decoded = image::load_from_memory(data)
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let gray = decoded.to_luma8();
        let width = gray.width() as usize;
        let height = gray.height() as usize;

        debug!("Decoded image: {}x{}", width, height);

        if width == 0 || height == 0 {
            return Err(PipelineError::EmptyImage(width, height));
        }

        Raster::from_vec(width, height, gray.into_raw())
    }
}
