//! Disparity visualization module
//!
//! Joint 8-bit normalization of both disparity fields of a pair, followed by
//! palette colorization.

mod normalizer;
mod palette;
mod colorizer;

pub use normalizer::{NormalizedPair, joint_scale, max_finite, normalize, normalize_pair};
pub use palette::TURBO_PALETTE;
pub use colorizer::Colorizer;
