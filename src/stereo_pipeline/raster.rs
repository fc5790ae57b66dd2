//! In-memory raster buffers
//!
//! Owned, row-major buffers for every stage of the pipeline plus the validated
//! stereo pair handed to the disparity engine.

mod types;
mod pair;

pub use types::{ColorRaster, DisparityField, GrayscaleImage, NormalizedIntensity, Raster};
pub use pair::{DisparityPair, StereoPair};
