#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use crate::stereo_pipeline::common::error::{PipelineError, Result};
    use crate::stereo_pipeline::engine::DisparityEngine;
    use crate::stereo_pipeline::loader::GrayscaleReader;
    use crate::stereo_pipeline::output::{DisparityWriter, OutputNaming, PipelineConfig};
    use crate::stereo_pipeline::pipelines::{PairOutcome, PipelineStage, RenderedView, StereoDisparityPipeline};
    use crate::stereo_pipeline::raster::{ColorRaster, DisparityField, DisparityPair, GrayscaleImage, Raster, StereoPair};
    use crate::stereo_pipeline::visualize::TURBO_PALETTE;

    /// Parses inputs of the form `<width>x<height>:<value>` into a uniform image.
    struct MockReader;

    impl GrayscaleReader for MockReader {
        fn read_gray(&self, data: &[u8]) -> Result<GrayscaleImage> {
            let bad = || PipelineError::DecodeError("Mock decode error".to_string());
            let text = std::str::from_utf8(data).map_err(|_| bad())?;
            let (dims, value) = text.trim().split_once(':').ok_or_else(bad)?;
            let (width, height) = dims.split_once('x').ok_or_else(bad)?;
            Ok(Raster::new(
                width.parse().map_err(|_| bad())?,
                height.parse().map_err(|_| bad())?,
                value.parse().map_err(|_| bad())?,
            ))
        }
    }

    struct MockEngine {
        left_value: f32,
        right_value: f32,
        wrong_dimensions: bool,
        calls: Arc<Mutex<usize>>,
    }

    impl MockEngine {
        fn uniform(left_value: f32, right_value: f32) -> Self {
            Self {
                left_value,
                right_value,
                wrong_dimensions: false,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl DisparityEngine for MockEngine {
        fn compute(&self, pair: &StereoPair) -> Result<DisparityPair> {
            *self.calls.lock().unwrap() += 1;
            let (width, height) = pair.dimensions();
            let right_height = if self.wrong_dimensions { height + 1 } else { height };
            Ok(DisparityPair {
                left: Raster::new(width, height, self.left_value),
                right: Raster::new(width, right_height, self.right_value),
            })
        }
    }

    struct MockWriter {
        fail_on_call: Option<usize>,
        calls: Arc<Mutex<usize>>,
    }

    impl MockWriter {
        fn working() -> Self {
            Self { fail_on_call: None, calls: Arc::new(Mutex::new(0)) }
        }

        fn next_call(&self) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.fail_on_call == Some(*calls) {
                return Err(PipelineError::EncodeError("Mock encode error".to_string()));
            }
            Ok(())
        }
    }

    impl DisparityWriter for MockWriter {
        fn write_raw(&self, field: &DisparityField, output: &mut dyn Write) -> Result<()> {
            self.next_call()?;
            writeln!(output, "raw {}x{}", field.width(), field.height())?;
            Ok(())
        }

        fn write_color(&self, image: &ColorRaster, output: &mut dyn Write) -> Result<()> {
            self.next_call()?;
            writeln!(output, "color {}x{}", image.width(), image.height())?;
            Ok(())
        }
    }

    fn pipeline(
        engine: MockEngine,
        writer: MockWriter,
        config: PipelineConfig,
    ) -> StereoDisparityPipeline<MockReader, MockEngine, MockWriter> {
        StereoDisparityPipeline::with_custom(MockReader, engine, writer, config)
    }

    fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_render_colorized_uses_joint_scale() {
        let pipeline = pipeline(MockEngine::uniform(10.0, 20.0), MockWriter::working(), PipelineConfig::default());

        let rendered = pipeline.render(b"4x3:128", b"4x3:128").unwrap();

        assert_eq!((rendered.width, rendered.height), (4, 3));
        assert_eq!(rendered.scale, Some(12.75));
        match (&rendered.left, &rendered.right) {
            (RenderedView::Colorized(left), RenderedView::Colorized(right)) => {
                assert_eq!(left.dimensions(), (4, 3));
                assert!(left.pixels().iter().all(|c| *c == TURBO_PALETTE[127]));
                assert!(right.pixels().iter().all(|c| *c == TURBO_PALETTE[255]));
            }
            _ => panic!("expected colorized views"),
        }
    }

    #[test]
    fn test_render_raw_keeps_engine_output() {
        let config = PipelineConfig::builder().write_raw(true).build();
        let pipeline = pipeline(MockEngine::uniform(1.5, 300.25), MockWriter::working(), config);

        let rendered = pipeline.render(b"2x2:0", b"2x2:0").unwrap();

        assert_eq!(rendered.scale, None);
        match (&rendered.left, &rendered.right) {
            (RenderedView::Raw(left), RenderedView::Raw(right)) => {
                assert!(left.pixels().iter().all(|&v| v == 1.5));
                assert!(right.pixels().iter().all(|&v| v == 300.25));
            }
            _ => panic!("expected raw views"),
        }
    }

    #[test]
    fn test_all_zero_disparity_renders_first_palette_entry() {
        let pipeline = pipeline(MockEngine::uniform(0.0, 0.0), MockWriter::working(), PipelineConfig::default());

        let rendered = pipeline.render(b"4x4:128", b"4x4:128").unwrap();

        assert_eq!(rendered.scale, Some(0.0));
        if let RenderedView::Colorized(left) = &rendered.left {
            assert!(left.pixels().iter().all(|c| *c == TURBO_PALETTE[0]));
        } else {
            panic!("expected colorized view");
        }
    }

    #[test]
    fn test_dimension_mismatch_skips_engine() {
        let engine = MockEngine::uniform(1.0, 1.0);
        let calls = engine.calls.clone();
        let pipeline = pipeline(engine, MockWriter::working(), PipelineConfig::default());

        let result = pipeline.render(b"640x480:1", b"320x240:1");

        let err = result.unwrap_err();
        assert!(matches!(err, PipelineError::DimensionMismatch { .. }));
        assert!(err.to_string().contains("640 x 480"));
        assert!(err.to_string().contains("320 x 240"));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_reader_failure_names_the_view() {
        let pipeline = pipeline(MockEngine::uniform(1.0, 1.0), MockWriter::working(), PipelineConfig::default());

        let err = pipeline.render(b"4x4:1", b"garbage").unwrap_err();

        match err {
            PipelineError::DecodeError(msg) => assert!(msg.starts_with("right image")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_engine_contract_violation() {
        let mut engine = MockEngine::uniform(1.0, 1.0);
        engine.wrong_dimensions = true;
        let pipeline = pipeline(engine, MockWriter::working(), PipelineConfig::default());

        let err = pipeline.render(b"4x4:1", b"4x4:1").unwrap_err();

        assert!(matches!(err, PipelineError::EngineContract(_)));
    }

    #[test]
    fn test_process_pair_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_input(dir.path(), "left.png", "4x4:128");
        let right = write_input(dir.path(), "right.png", "4x4:128");
        let config = PipelineConfig::builder().suffix("_out").build();
        let pipeline = pipeline(MockEngine::uniform(2.0, 4.0), MockWriter::working(), config);

        let report = pipeline.process_pair(&left, &right).unwrap();

        assert_eq!(report.left_output, dir.path().join("left_out.png"));
        assert_eq!(report.right_output, dir.path().join("right_out.png"));
        assert_eq!(std::fs::read_to_string(&report.left_output).unwrap(), "color 4x4\n");
        assert_eq!(
            file_names(dir.path()),
            vec!["left.png", "left_out.png", "right.png", "right_out.png"]
        );
        for stage in [PipelineStage::Loaded, PipelineStage::Validated, PipelineStage::Computed,
                      PipelineStage::Normalized, PipelineStage::Colorized, PipelineStage::Written] {
            assert!(report.timings.get_step(stage.as_str()).is_some(), "missing {stage}");
        }
    }

    #[test]
    fn test_process_pair_raw_mode_and_legacy_names() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_input(dir.path(), "im0.pgm", "3x2:7");
        let right = write_input(dir.path(), "im1.pgm", "3x2:7");
        let config = PipelineConfig::builder()
            .write_raw(true)
            .suffix("_ignored")
            .naming(OutputNaming::Legacy)
            .build();
        let pipeline = pipeline(MockEngine::uniform(2.0, 4.0), MockWriter::working(), config);

        let report = pipeline.process_pair(&left, &right).unwrap();

        assert_eq!(report.left_output, dir.path().join("im0_disp.tiff"));
        assert_eq!(std::fs::read_to_string(&report.right_output).unwrap(), "raw 3x2\n");
        assert!(report.timings.get_step(PipelineStage::Normalized.as_str()).is_none());
    }

    #[test]
    fn test_mismatch_creates_no_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_input(dir.path(), "left.png", "640x480:1");
        let right = write_input(dir.path(), "right.png", "320x240:1");
        let pipeline = pipeline(MockEngine::uniform(1.0, 1.0), MockWriter::working(), PipelineConfig::default());

        let result = pipeline.process_pair(&left, &right);

        assert!(matches!(result, Err(PipelineError::DimensionMismatch { .. })));
        assert_eq!(file_names(dir.path()), vec!["left.png", "right.png"]);
    }

    #[test]
    fn test_second_write_failure_leaves_no_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let left = write_input(dir.path(), "left.png", "4x4:1");
        let right = write_input(dir.path(), "right.png", "4x4:1");
        let writer = MockWriter { fail_on_call: Some(2), calls: Arc::new(Mutex::new(0)) };
        let pipeline = pipeline(MockEngine::uniform(1.0, 1.0), writer, PipelineConfig::default());

        let result = pipeline.process_pair(&left, &right);

        assert!(matches!(result, Err(PipelineError::EncodeError(_))));
        assert_eq!(file_names(dir.path()), vec!["left.png", "right.png"]);
    }

    #[test]
    fn test_missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let right = write_input(dir.path(), "right.png", "4x4:1");
        let pipeline = pipeline(MockEngine::uniform(1.0, 1.0), MockWriter::working(), PipelineConfig::default());

        let result = pipeline.process_pair(dir.path().join("absent.png"), &right);

        match result {
            Err(PipelineError::InputReadError(msg)) => assert!(msg.contains("absent.png")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_batch_continues_after_failed_pair() {
        let dir = tempfile::tempdir().unwrap();
        let bad_left = write_input(dir.path(), "a_left.png", "8x8:1");
        let bad_right = write_input(dir.path(), "a_right.png", "4x4:1");
        let good_left = write_input(dir.path(), "b_left.png", "4x4:1");
        let good_right = write_input(dir.path(), "b_right.png", "4x4:1");
        let pipeline = pipeline(MockEngine::uniform(1.0, 2.0), MockWriter::working(), PipelineConfig::default());

        let outcomes = pipeline.process_batch(vec![(bad_left, bad_right), (good_left, good_right)]);

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_ok());
        assert!(outcomes[1].is_ok());
        assert_eq!(outcomes[0].failed_at, Some(PipelineStage::Loaded));
        assert_eq!(outcomes[1].failed_at, None);
        assert!(dir.path().join("b_left_disp_.png").exists());
        assert!(!dir.path().join("a_left_disp_.png").exists());
    }

    #[test]
    fn test_batch_records_the_failing_stage() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_input(dir.path(), "good.png", "4x4:1");
        let garbage = write_input(dir.path(), "garbage.png", "not an image");
        let missing = dir.path().join("absent.png");

        let mut engine = MockEngine::uniform(1.0, 1.0);
        engine.wrong_dimensions = true;
        let broken_engine = pipeline(engine, MockWriter::working(), PipelineConfig::default());
        let failing_writer = pipeline(
            MockEngine::uniform(1.0, 1.0),
            MockWriter { fail_on_call: Some(1), calls: Arc::new(Mutex::new(0)) },
            PipelineConfig::default(),
        );
        let raw = pipeline(
            MockEngine::uniform(1.0, 1.0),
            MockWriter { fail_on_call: Some(1), calls: Arc::new(Mutex::new(0)) },
            PipelineConfig::builder().write_raw(true).build(),
        );
        let working = pipeline(MockEngine::uniform(1.0, 1.0), MockWriter::working(), PipelineConfig::default());

        let failed_at = |outcomes: Vec<PairOutcome>| outcomes[0].failed_at;

        assert_eq!(
            failed_at(working.process_batch(vec![(&missing, &good)])),
            Some(PipelineStage::Idle)
        );
        assert_eq!(
            failed_at(working.process_batch(vec![(&good, &garbage)])),
            Some(PipelineStage::Idle)
        );
        assert_eq!(
            failed_at(broken_engine.process_batch(vec![(&good, &good)])),
            Some(PipelineStage::Validated)
        );
        assert_eq!(
            failed_at(failing_writer.process_batch(vec![(&good, &good)])),
            Some(PipelineStage::Colorized)
        );
        assert_eq!(
            failed_at(raw.process_batch(vec![(&good, &good)])),
            Some(PipelineStage::Computed)
        );
    }
}
