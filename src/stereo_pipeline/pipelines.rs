//! Pipeline orchestration module
//!
//! This module sequences loading, validation, disparity computation,
//! visualization and output for one stereo pair or a batch of pairs.

mod stage;
mod timing;
mod stereo_to_disparity;

#[cfg(test)]
mod tests;

pub use stage::PipelineStage;
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use stereo_to_disparity::{PairOutcome, PairReport, RenderedPair, RenderedView, StereoDisparityPipeline};
