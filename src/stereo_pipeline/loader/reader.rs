use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::raster::GrayscaleImage;

pub trait GrayscaleReader {
    fn read_gray(&self, data: &[u8]) -> Result<GrayscaleImage>;
}
