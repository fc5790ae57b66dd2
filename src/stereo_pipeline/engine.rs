//! Disparity computation module
//!
//! The pipeline only depends on the [`DisparityEngine`] trait; any dense
//! matcher producing one field per reference view can be plugged in.

mod matcher;
mod block_matching;

pub use matcher::DisparityEngine;
pub use block_matching::{BlockMatchingEngine, BlockMatchingParams, MAX_DISPARITY_LIMIT, MAX_WINDOW_RADIUS};
