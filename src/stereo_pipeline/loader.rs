//! Grayscale image loading module
//!
//! This module provides format-agnostic decoding of input images into 8-bit grayscale rasters.

mod reader;
mod decoding_reader;

pub use reader::GrayscaleReader;
pub use decoding_reader::DecodingReader;
