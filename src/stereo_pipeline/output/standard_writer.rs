use std::io::Write;
use image::ImageEncoder;
use tracing::debug;
use crate::stereo_pipeline::common::error::{Result, PipelineError};
use crate::stereo_pipeline::raster::{ColorRaster, DisparityField};
use crate::stereo_pipeline::output::writer::DisparityWriter;

/// Writes raw disparity as single-channel float TIFF and colorized disparity as RGB PNG.
pub struct StandardDisparityWriter;

impl DisparityWriter for StandardDisparityWriter {
    fn write_raw(&self, field: &DisparityField, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding float TIFF: {}x{}", field.width(), field.height());

        // The TIFF encoder needs Seek, so encode into memory first
        let mut buffer = Vec::new();

        {
            let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

            encoder.write_image::<tiff::encoder::colortype::Gray32Float>(
                field.width() as u32,
                field.height() as u32,
                field.pixels(),
            ).map_err(|e| PipelineError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }

    fn write_color(&self, image: &ColorRaster, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding RGB PNG: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();

        image::codecs::png::PngEncoder::new(&mut buffer)
            .write_image(
                &image.as_interleaved(),
                image.width() as u32,
                image.height() as u32,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("PNG encoding complete");
        Ok(())
    }
}
