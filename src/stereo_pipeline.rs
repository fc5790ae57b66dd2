//! Stereo disparity pipeline module
//!
//! This module turns a rectified stereo image pair into two disparity outputs,
//! one per reference view, with separate modules for image loading, disparity
//! computation, visualization, output encoding and orchestration.

pub mod common;
pub mod raster;
pub mod loader;
pub mod engine;
pub mod visualize;
pub mod output;
pub mod pipelines;

pub use common::{
    PipelineError,
    Result,
};

pub use raster::{
    ColorRaster,
    DisparityField,
    DisparityPair,
    GrayscaleImage,
    NormalizedIntensity,
    Raster,
    StereoPair,
};

pub use loader::{
    DecodingReader,
    GrayscaleReader,
};

pub use engine::{
    BlockMatchingEngine,
    BlockMatchingParams,
    DisparityEngine,
    MAX_DISPARITY_LIMIT,
    MAX_WINDOW_RADIUS,
};

pub use visualize::{
    Colorizer,
    NormalizedPair,
    TURBO_PALETTE,
    joint_scale,
    max_finite,
    normalize,
    normalize_pair,
};

pub use output::{
    DEFAULT_SUFFIX,
    DisparityWriter,
    OutputMode,
    OutputNaming,
    PipelineConfig,
    PipelineConfigBuilder,
    StandardDisparityWriter,
    output_path,
};

pub use pipelines::{
    PairOutcome,
    PairReport,
    PipelineStage,
    PipelineTimings,
    RenderedPair,
    RenderedView,
    StepTiming,
    StereoDisparityPipeline,
    Timer,
};
