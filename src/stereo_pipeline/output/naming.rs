use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::stereo_pipeline::output::types::PipelineConfig;

/// Output path for one input image: the input's last extension is dropped and
/// replaced with the configured marker plus the mode's extension. The output
/// lands in the input's directory.
///
/// `left.png` with suffix `_disp_` in colorized mode becomes `left_disp_.png`.
pub fn output_path(input: &Path, config: &PipelineConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();

    let mut name = OsString::with_capacity(stem.len() + config.marker().len() + 5);
    name.push(stem);
    name.push(config.marker());
    name.push(".");
    name.push(config.mode().extension());

    input.with_file_name(name)
}
