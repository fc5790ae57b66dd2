use std::fmt;

use tracing::{debug, warn};

/// States a pair moves through. Any I/O step or the validation step can end
/// in [`PipelineStage::Failed`] instead, in which case the pair's buffers are
/// dropped and the error is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    Loaded,
    Validated,
    Computed,
    Normalized,
    Colorized,
    Written,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Loaded => "loaded",
            PipelineStage::Validated => "validated",
            PipelineStage::Computed => "computed",
            PipelineStage::Normalized => "normalized",
            PipelineStage::Colorized => "colorized",
            PipelineStage::Written => "written",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }

    /// Moves to `next`, logging the transition.
    pub fn advance(&mut self, next: PipelineStage) {
        debug!("{} -> {}", self, next);
        *self = next;
    }

    /// Moves to [`PipelineStage::Failed`] and returns the stage the failure
    /// happened in.
    pub fn fail(&mut self, reason: &dyn fmt::Display) -> PipelineStage {
        let from = *self;
        warn!("{} -> {}: {}", from, PipelineStage::Failed, reason);
        *self = PipelineStage::Failed;
        from
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
