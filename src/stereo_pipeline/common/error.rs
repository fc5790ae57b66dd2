use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode output image: {0}")]
    EncodeError(String),

    #[error("Image has no pixels: width={0}, height={1}")]
    EmptyImage(usize, usize),

    #[error(
        "Images must be of same size, but left: {left_width} x {left_height}, right: {right_width} x {right_height}"
    )]
    DimensionMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },

    #[error("Raster buffer holds {actual} pixels but {width}x{height} requires {expected}")]
    InvalidRaster {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Disparity engine broke its contract: {0}")]
    EngineContract(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
