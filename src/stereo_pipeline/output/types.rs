//! Output configuration types

/// Suffix inserted between the input stem and the output extension.
pub const DEFAULT_SUFFIX: &str = "_disp_";

/// Marker the historical tool always used, regardless of the configured suffix.
pub const LEGACY_MARKER: &str = "_disp";

/// What gets written per reference view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Jointly scaled disparity, colorized and written as an 8-bit RGB PNG
    Colorized,
    /// Unscaled float disparity written as a 32-bit IEEE float TIFF
    Raw,
}

impl OutputMode {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputMode::Colorized => "png",
            OutputMode::Raw => "tiff",
        }
    }
}

/// How output file names are derived from input file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputNaming {
    /// `<stem><suffix>.<ext>` using the configured suffix
    #[default]
    Suffix,
    /// `<stem>_disp.<ext>`; the configured suffix is ignored
    Legacy,
}

/// Per-invocation output settings. Immutable once built.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Write the raw float disparity instead of a colorized raster
    pub write_raw: bool,
    /// Suffix inserted into output file names
    pub suffix: String,
    /// Naming scheme for output files
    pub naming: OutputNaming,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            write_raw: false,
            suffix: DEFAULT_SUFFIX.to_string(),
            naming: OutputNaming::Suffix,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub fn mode(&self) -> OutputMode {
        if self.write_raw {
            OutputMode::Raw
        } else {
            OutputMode::Colorized
        }
    }

    /// The string actually placed between stem and extension.
    pub fn marker(&self) -> &str {
        match self.naming {
            OutputNaming::Suffix => &self.suffix,
            OutputNaming::Legacy => LEGACY_MARKER,
        }
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    write_raw: Option<bool>,
    suffix: Option<String>,
    naming: Option<OutputNaming>,
}

impl PipelineConfigBuilder {
    pub fn write_raw(mut self, enable: bool) -> Self {
        self.write_raw = Some(enable);
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn naming(mut self, naming: OutputNaming) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            write_raw: self.write_raw.unwrap_or(default.write_raw),
            suffix: self.suffix.unwrap_or(default.suffix),
            naming: self.naming.unwrap_or(default.naming),
        }
    }
}
