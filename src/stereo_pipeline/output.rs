//! Disparity output module
//!
//! Output configuration, file naming, PNG/TIFF encoding and the all-or-nothing
//! commit of both files produced for a pair.

mod types;
mod naming;
mod writer;
mod standard_writer;
mod commit;

pub use types::{DEFAULT_SUFFIX, LEGACY_MARKER, OutputMode, OutputNaming, PipelineConfig, PipelineConfigBuilder};
pub use naming::output_path;
pub use writer::DisparityWriter;
pub use standard_writer::StandardDisparityWriter;
pub use commit::{StagedOutput, commit_all};
