use std::io::Write;
use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::raster::{ColorRaster, DisparityField};

pub trait DisparityWriter {
    fn write_raw(&self, field: &DisparityField, output: &mut dyn Write) -> Result<()>;
    fn write_color(&self, image: &ColorRaster, output: &mut dyn Write) -> Result<()>;
}
