//! # Block matching disparity computation
//!
//! Sum-of-absolute-differences window matching over a fixed disparity range,
//! with parabolic sub-pixel refinement of the winning candidate.

use tracing::{debug, instrument, warn};

use crate::stereo_pipeline::common::error::Result;
use crate::stereo_pipeline::engine::matcher::DisparityEngine;
use crate::stereo_pipeline::raster::{DisparityField, DisparityPair, GrayscaleImage, Raster, StereoPair};

/// Upper bound on [`BlockMatchingParams::max_disparity`].
pub const MAX_DISPARITY_LIMIT: usize = 4096;
/// Upper bound on [`BlockMatchingParams::window_radius`].
pub const MAX_WINDOW_RADIUS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMatchingParams {
    /// Largest disparity searched, inclusive.
    pub max_disparity: usize,
    /// Half-size of the square correlation window; the window is `2r + 1` pixels wide.
    pub window_radius: usize,
}

impl Default for BlockMatchingParams {
    fn default() -> Self {
        Self {
            max_disparity: 64,
            window_radius: 3,
        }
    }
}

pub struct BlockMatchingEngine {
    params: BlockMatchingParams,
}

/// Which image the output field is indexed by.
#[derive(Debug, Clone, Copy)]
enum Reference {
    Left,
    Right,
}

impl BlockMatchingEngine {
    /// Parameters above [`MAX_DISPARITY_LIMIT`] or [`MAX_WINDOW_RADIUS`] are
    /// clamped to those limits.
    pub fn new(params: BlockMatchingParams) -> Self {
        let clamped = BlockMatchingParams {
            max_disparity: params.max_disparity.min(MAX_DISPARITY_LIMIT),
            window_radius: params.window_radius.min(MAX_WINDOW_RADIUS),
        };
        if clamped != params {
            warn!(
                "Block matching parameters {:?} clamped to {:?}",
                params, clamped
            );
        }
        Self { params: clamped }
    }

    /// Mean absolute difference between the window around `(x, y)` in `base`
    /// and the window around `(x + shift, y)` in `other`. Samples outside the
    /// image are clamped to the nearest edge pixel.
    fn window_cost(
        &self,
        base: &GrayscaleImage,
        other: &GrayscaleImage,
        x: usize,
        y: usize,
        shift: isize,
    ) -> f32 {
        let r = self.params.window_radius as isize;
        let mut acc = 0u64;

        for j in -r..=r {
            for i in -r..=r {
                let xi = x as isize + i;
                let yj = y as isize + j;
                let a = sample(base, xi, yj);
                let b = sample(other, xi + shift, yj);
                acc += u64::from(a.abs_diff(b));
            }
        }

        let n = ((2 * r + 1) * (2 * r + 1)) as u64;
        (acc as f64 / n as f64) as f32
    }

    fn compute_field(&self, pair: &StereoPair, reference: Reference) -> DisparityField {
        let (width, height) = pair.dimensions();
        let (base, other) = match reference {
            Reference::Left => (pair.left(), pair.right()),
            Reference::Right => (pair.right(), pair.left()),
        };

        let mut field = Raster::new(width, height, 0.0f32);
        let mut costs: Vec<f32> =
            Vec::with_capacity(self.params.max_disparity.min(width.saturating_sub(1)) + 1);

        for y in 0..height {
            for x in 0..width {
                // Candidates whose match would fall outside the other image are skipped.
                let reachable = match reference {
                    Reference::Left => x,
                    Reference::Right => width - 1 - x,
                };
                let max_d = self.params.max_disparity.min(reachable);

                costs.clear();
                for d in 0..=max_d {
                    let shift = match reference {
                        Reference::Left => -(d as isize),
                        Reference::Right => d as isize,
                    };
                    costs.push(self.window_cost(base, other, x, y, shift));
                }

                field.put(x, y, refine(&costs));
            }
        }

        field
    }
}

impl Default for BlockMatchingEngine {
    fn default() -> Self {
        Self::new(BlockMatchingParams::default())
    }
}

impl DisparityEngine for BlockMatchingEngine {
    #[instrument(skip(self, pair), fields(width = pair.width(), height = pair.height()))]
    fn compute(&self, pair: &StereoPair) -> Result<DisparityPair> {
        debug!(
            "Block matching with max_disparity={} window_radius={}",
            self.params.max_disparity, self.params.window_radius
        );

        let left = self.compute_field(pair, Reference::Left);
        let right = self.compute_field(pair, Reference::Right);

        Ok(DisparityPair { left, right })
    }
}

fn sample(image: &GrayscaleImage, x: isize, y: isize) -> u8 {
    let xc = x.clamp(0, image.width() as isize - 1) as usize;
    let yc = y.clamp(0, image.height() as isize - 1) as usize;
    *image.get(xc, yc)
}

/// Winner-takes-all over `costs` (index = disparity). The first minimum wins,
/// so flat cost curves resolve to the smallest disparity.
fn refine(costs: &[f32]) -> f32 {
    let min_index = costs
        .iter()
        .enumerate()
        .fold(0, |min_idx, (idx, &val)| if val < costs[min_idx] { idx } else { min_idx });

    // On the outer edge of the search range there is no parabola to fit
    if min_index == 0 || min_index == costs.len() - 1 {
        return min_index as f32;
    }

    let c_left = costs[min_index - 1];
    let c_mid = costs[min_index];
    let c_right = costs[min_index + 1];
    let denom = c_left - 2.0 * c_mid + c_right;

    if denom <= f32::EPSILON {
        return min_index as f32;
    }

    min_index as f32 + 0.5 * (c_left - c_right) / denom
}
