use tracing::{error, info, instrument, warn};
use std::path::{Path, PathBuf};

use crate::stereo_pipeline::{
    common::error::{PipelineError, Result},
    engine::{BlockMatchingEngine, BlockMatchingParams, DisparityEngine},
    loader::{DecodingReader, GrayscaleReader},
    output::{DisparityWriter, OutputMode, PipelineConfig, StagedOutput, StandardDisparityWriter, commit_all, output_path},
    pipelines::{PipelineStage, PipelineTimings, Timer},
    raster::{ColorRaster, DisparityField, GrayscaleImage, StereoPair},
    visualize::{Colorizer, normalize_pair},
};

/// What gets encoded for one reference view.
#[derive(Debug, Clone)]
pub enum RenderedView {
    Raw(DisparityField),
    Colorized(ColorRaster),
}

/// Both views of a pair, ready to be encoded.
#[derive(Debug, Clone)]
pub struct RenderedPair {
    pub width: usize,
    pub height: usize,
    /// Joint normalization scale; `None` in raw mode where nothing is scaled.
    pub scale: Option<f32>,
    pub left: RenderedView,
    pub right: RenderedView,
}

/// Result of a successfully processed pair.
#[derive(Debug, Clone)]
pub struct PairReport {
    pub left_output: PathBuf,
    pub right_output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub scale: Option<f32>,
    pub timings: PipelineTimings,
}

/// One entry of a batch run.
#[derive(Debug)]
pub struct PairOutcome {
    pub left: PathBuf,
    pub right: PathBuf,
    pub result: Result<PairReport>,
    /// Stage the pair was in when it failed; `None` on success.
    pub failed_at: Option<PipelineStage>,
}

impl PairOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct StereoDisparityPipeline<R: GrayscaleReader, E: DisparityEngine, W: DisparityWriter> {
    reader: R,
    engine: E,
    writer: W,
    colorizer: Colorizer,
    config: PipelineConfig,
}

impl StereoDisparityPipeline<DecodingReader, BlockMatchingEngine, StandardDisparityWriter> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_engine_params(config, BlockMatchingParams::default())
    }

    pub fn with_engine_params(config: PipelineConfig, params: BlockMatchingParams) -> Self {
        Self {
            reader: DecodingReader,
            engine: BlockMatchingEngine::new(params),
            writer: StandardDisparityWriter,
            colorizer: Colorizer::turbo(),
            config,
        }
    }
}

impl<R: GrayscaleReader, E: DisparityEngine, W: DisparityWriter> StereoDisparityPipeline<R, E, W> {
    pub fn with_custom(reader: R, engine: E, writer: W, config: PipelineConfig) -> Self {
        Self {
            reader,
            engine,
            writer,
            colorizer: Colorizer::turbo(),
            config,
        }
    }

    fn decode(&self, data: &[u8], source: &str) -> Result<GrayscaleImage> {
        self.reader.read_gray(data).map_err(|e| match e {
            PipelineError::DecodeError(msg) => PipelineError::DecodeError(format!("{}: {}", source, msg)),
            other => other,
        })
    }

    /// Runs everything between decoding and encoding, entirely in memory.
    pub fn render(&self, left_data: &[u8], right_data: &[u8]) -> Result<RenderedPair> {
        let mut timings = PipelineTimings::new();
        let mut stage = PipelineStage::Idle;
        self.render_timed(
            (left_data, "left image"),
            (right_data, "right image"),
            &mut timings,
            &mut stage,
        )
        .map_err(|e| {
            stage.fail(&e);
            e
        })
    }

    fn render_timed(
        &self,
        (left_data, left_source): (&[u8], &str),
        (right_data, right_source): (&[u8], &str),
        timings: &mut PipelineTimings,
        stage: &mut PipelineStage,
    ) -> Result<RenderedPair> {
        let timer = Timer::start(PipelineStage::Loaded.as_str());
        let (left, right) = {
            let _span = tracing::info_span!("decode_inputs").entered();
            (self.decode(left_data, left_source)?, self.decode(right_data, right_source)?)
        };
        timings.record(timer);
        stage.advance(PipelineStage::Loaded);

        let timer = Timer::start(PipelineStage::Validated.as_str());
        let pair = {
            let _span = tracing::info_span!("validate_dimensions",
                left_width = left.width(),
                left_height = left.height(),
                right_width = right.width(),
                right_height = right.height()
            ).entered();
            StereoPair::new(left, right)?
        };
        timings.record(timer);
        let (width, height) = pair.dimensions();
        stage.advance(PipelineStage::Validated);

        let timer = Timer::start(PipelineStage::Computed.as_str());
        let disparities = {
            let _span = tracing::info_span!("compute_disparity", width, height).entered();
            let disparities = self.engine.compute(&pair)?;
            disparities.ensure_dimensions((width, height))?;
            disparities
        };
        // Input images are not needed past this point
        drop(pair);
        timings.record(timer);
        stage.advance(PipelineStage::Computed);

        if self.config.mode() == OutputMode::Raw {
            return Ok(RenderedPair {
                width,
                height,
                scale: None,
                left: RenderedView::Raw(disparities.left),
                right: RenderedView::Raw(disparities.right),
            });
        }

        let timer = Timer::start(PipelineStage::Normalized.as_str());
        let normalized = {
            let _span = tracing::info_span!("normalize").entered();
            normalize_pair(&disparities)
        };
        drop(disparities);
        timings.record(timer);
        stage.advance(PipelineStage::Normalized);

        let timer = Timer::start(PipelineStage::Colorized.as_str());
        let (left_color, right_color) = {
            let _span = tracing::info_span!("colorize").entered();
            (self.colorizer.colorize(&normalized.left), self.colorizer.colorize(&normalized.right))
        };
        timings.record(timer);
        stage.advance(PipelineStage::Colorized);

        Ok(RenderedPair {
            width,
            height,
            scale: Some(normalized.scale),
            left: RenderedView::Colorized(left_color),
            right: RenderedView::Colorized(right_color),
        })
    }

    fn stage_view(&self, view: &RenderedView, destination: &Path) -> Result<StagedOutput> {
        StagedOutput::stage(destination, |output| match view {
            RenderedView::Raw(field) => self.writer.write_raw(field, output),
            RenderedView::Colorized(image) => self.writer.write_color(image, output),
        })
    }

    /// Processes one pair from disk: both output files are written, or on
    /// failure neither is.
    pub fn process_pair<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        left_path: P,
        right_path: Q,
    ) -> Result<PairReport> {
        self.process_tracked(left_path.as_ref(), right_path.as_ref())
            .map_err(|(_, e)| e)
    }

    /// Like [`Self::process_pair`], but a failure also carries the stage it
    /// happened in.
    #[instrument(name = "process_pair", skip_all)]
    fn process_tracked(
        &self,
        left_path: &Path,
        right_path: &Path,
    ) -> std::result::Result<PairReport, (PipelineStage, PipelineError)> {
        let mut stage = PipelineStage::Idle;
        self.run_pair(left_path, right_path, &mut stage)
            .map_err(|e| (stage.fail(&e), e))
    }

    fn run_pair(
        &self,
        left_path: &Path,
        right_path: &Path,
        stage: &mut PipelineStage,
    ) -> Result<PairReport> {
        let mut timings = PipelineTimings::new();

        info!("Processing: {}, {}", left_path.display(), right_path.display());

        let timer = Timer::start("read_input_files");
        let (left_data, right_data) = {
            let _span = tracing::info_span!("read_input_files").entered();
            (read_input(left_path)?, read_input(right_path)?)
        };
        timings.record(timer);

        let left_source = left_path.display().to_string();
        let right_source = right_path.display().to_string();
        let rendered = self.render_timed(
            (left_data.as_slice(), left_source.as_str()),
            (right_data.as_slice(), right_source.as_str()),
            &mut timings,
            stage,
        )?;
        drop(left_data);
        drop(right_data);

        let left_output = output_path(left_path, &self.config);
        let right_output = output_path(right_path, &self.config);
        if left_output == right_output {
            warn!(
                "Both views map to {}; the right view will replace the left",
                left_output.display()
            );
        }

        let timer = Timer::start(PipelineStage::Written.as_str());
        {
            let _span = tracing::info_span!("write_outputs").entered();
            let staged = vec![
                self.stage_view(&rendered.left, &left_output)?,
                self.stage_view(&rendered.right, &right_output)?,
            ];
            commit_all(staged)?;
        }
        timings.record(timer);
        stage.advance(PipelineStage::Written);
        stage.advance(PipelineStage::Done);

        info!(
            width = rendered.width,
            height = rendered.height,
            left = %left_output.display(),
            right = %right_output.display(),
            "Pair complete"
        );

        Ok(PairReport {
            left_output,
            right_output,
            width: rendered.width,
            height: rendered.height,
            scale: rendered.scale,
            timings,
        })
    }

    /// Processes pairs one after another. A failing pair is logged and
    /// recorded; the remaining pairs still run.
    pub fn process_batch<I, P, Q>(&self, pairs: I) -> Vec<PairOutcome>
    where
        I: IntoIterator<Item = (P, Q)>,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        pairs
            .into_iter()
            .map(|(left, right)| {
                let left = left.as_ref().to_path_buf();
                let right = right.as_ref().to_path_buf();
                let (result, failed_at) = match self.process_tracked(&left, &right) {
                    Ok(report) => (Ok(report), None),
                    Err((stage, e)) => {
                        error!("{}, {}: {}", left.display(), right.display(), e);
                        (Err(e), Some(stage))
                    }
                };
                PairOutcome { left, right, result, failed_at }
            })
            .collect()
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        PipelineError::InputReadError(format!("{}: {}", path.display(), e))
    })
}
