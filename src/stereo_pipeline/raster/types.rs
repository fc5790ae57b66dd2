//! Raster buffer types

use crate::stereo_pipeline::common::error::{PipelineError, Result};

/// Owned row-major 2D buffer with explicit dimensions.
///
/// The pixel vector always holds exactly `width * height` elements; both
/// constructors enforce it so downstream stages never re-check.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<P> {
    width: usize,
    height: usize,
    data: Vec<P>,
}

/// 8-bit grayscale input image, one byte per pixel.
pub type GrayscaleImage = Raster<u8>;
/// Per-pixel floating point disparity for one reference view.
pub type DisparityField = Raster<f32>;
/// Disparity scaled into the 8-bit intensity domain.
pub type NormalizedIntensity = Raster<u8>;
/// Packed RGB raster, three bytes per pixel.
pub type ColorRaster = Raster<[u8; 3]>;

impl<P: Clone> Raster<P> {
    /// Creates a raster with every pixel set to `fill`.
    pub fn new(width: usize, height: usize, fill: P) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }
}

impl<P> Raster<P> {
    /// Wraps an existing buffer, rejecting one whose length disagrees with the dimensions.
    pub fn from_vec(width: usize, height: usize, data: Vec<P>) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(PipelineError::InvalidRaster {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: usize, y: usize) -> &P {
        &self.data[y * self.width + x]
    }

    pub fn put(&mut self, x: usize, y: usize, value: P) {
        self.data[y * self.width + x] = value;
    }

    pub fn pixels(&self) -> &[P] {
        &self.data
    }

    /// Builds a raster of the same shape by mapping every pixel independently.
    pub fn map<Q>(&self, f: impl FnMut(&P) -> Q) -> Raster<Q> {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl ColorRaster {
    /// Flattens the triplets into an interleaved `[R, G, B, R, G, B, ...]` buffer.
    pub fn as_interleaved(&self) -> Vec<u8> {
        self.data.iter().flatten().copied().collect()
    }
}
