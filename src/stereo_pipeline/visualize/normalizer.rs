use tracing::{debug, warn};

use crate::stereo_pipeline::raster::{DisparityField, DisparityPair, NormalizedIntensity};

/// Largest finite value in `field`, or `None` when it holds no finite value.
pub fn max_finite(field: &DisparityField) -> Option<f32> {
    field
        .pixels()
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.max(v))))
}

/// Scale factor mapping the joint maximum of both fields onto 255.
///
/// A pair whose joint maximum is missing, non-positive or non-finite gets a
/// scale of zero, so every normalized pixel becomes 0.
pub fn joint_scale(pair: &DisparityPair) -> f32 {
    let joint_max = match (max_finite(&pair.left), max_finite(&pair.right)) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    match joint_max {
        Some(max) if max > 0.0 => {
            let scale = 255.0 / max;
            if scale.is_finite() { scale } else { 0.0 }
        }
        _ => {
            debug!("Joint disparity maximum is {:?}, normalizing to zero", joint_max);
            0.0
        }
    }
}

/// Multiplies every element by `scale`, clamps to `[0, 255]` and truncates.
/// Non-finite disparities map to 0.
pub fn normalize(field: &DisparityField, scale: f32) -> NormalizedIntensity {
    let mut non_finite = 0usize;

    let normalized = field.map(|&v| {
        let scaled = v * scale;
        if !scaled.is_finite() {
            non_finite += 1;
            return 0;
        }
        scaled.clamp(0.0, 255.0) as u8
    });

    if non_finite > 0 {
        warn!("{} non-finite disparities mapped to 0", non_finite);
    }

    normalized
}

/// Both views of a pair reduced to 8-bit intensities with one shared scale.
#[derive(Debug, Clone)]
pub struct NormalizedPair {
    pub scale: f32,
    pub left: NormalizedIntensity,
    pub right: NormalizedIntensity,
}

/// Normalizes both views of a pair with their shared scale.
pub fn normalize_pair(pair: &DisparityPair) -> NormalizedPair {
    let scale = joint_scale(pair);
    debug!("Joint normalization scale: {}", scale);
    NormalizedPair {
        scale,
        left: normalize(&pair.left, scale),
        right: normalize(&pair.right, scale),
    }
}
