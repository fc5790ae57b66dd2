use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::raster::{DisparityPair, StereoPair};

/// Dense stereo matcher.
///
/// Implementations receive a pair whose images already share their
/// dimensions and must return two fields of exactly those dimensions: one
/// indexed by the left image, one indexed by the right image.
pub trait DisparityEngine {
    fn compute(&self, pair: &StereoPair) -> Result<DisparityPair>;
}
