use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use stereo_disparity::logger;
use stereo_disparity::stereo_pipeline::{
    BlockMatchingParams, DEFAULT_SUFFIX, MAX_DISPARITY_LIMIT, MAX_WINDOW_RADIUS, OutputNaming,
    PipelineConfig, StereoDisparityPipeline,
};

use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    name = "stereo-disparity",
    about = "Compute left- and right-referenced disparity maps for a rectified stereo pair",
    disable_help_flag = true,
    after_help = "Default is to write scaled, colorized disparities to .png file\nusing the given suffix."
)]
struct Args {
    /// Show this help information
    #[arg(short = 'h')]
    help: bool,

    /// Save raw disparities as a 32-bit float TIFF file
    #[arg(short = 'r')]
    raw: bool,

    /// Add suffix to output file names
    #[arg(
        short = 's',
        value_name = "suffix",
        default_value = DEFAULT_SUFFIX,
        allow_hyphen_values = true
    )]
    suffix: String,

    /// Name outputs <stem>_disp.<ext> regardless of the suffix
    #[arg(long)]
    legacy_names: bool,

    /// Largest disparity searched by the block matcher
    #[arg(
        long,
        value_name = "n",
        default_value_t = BlockMatchingParams::default().max_disparity as u64,
        value_parser = clap::value_parser!(u64).range(0..=MAX_DISPARITY_LIMIT as u64)
    )]
    max_disparity: u64,

    /// Half-size of the block matcher's correlation window
    #[arg(
        long,
        value_name = "n",
        default_value_t = BlockMatchingParams::default().window_radius as u64,
        value_parser = clap::value_parser!(u64).range(0..=MAX_WINDOW_RADIUS as u64)
    )]
    window_radius: u64,

    #[arg(value_name = "leftImage")]
    left: PathBuf,

    #[arg(value_name = "rightImage")]
    right: PathBuf,
}

fn usage() {
    eprintln!("{}", Args::command().render_help());
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            usage();
            return ExitCode::from(1);
        }
    };

    if args.help {
        usage();
        return ExitCode::from(1);
    }

    logger::init();

    let config = PipelineConfig::builder()
        .write_raw(args.raw)
        .suffix(args.suffix)
        .naming(if args.legacy_names { OutputNaming::Legacy } else { OutputNaming::Suffix })
        .build();
    let params = BlockMatchingParams {
        max_disparity: args.max_disparity as usize,
        window_radius: args.window_radius as usize,
    };

    debug!("Output mode: {:?}, marker: {:?}", config.mode(), config.marker());
    let pipeline = StereoDisparityPipeline::with_engine_params(config, params);

    // Per-pair failures are reported but do not change the exit status.
    match pipeline.process_pair(&args.left, &args.right) {
        Ok(report) => {
            info!("Wrote {}", report.left_output.display());
            info!("Wrote {}", report.right_output.display());
            report.timings.log_summary();
        }
        Err(e) => error!("{}", e),
    }

    info!("... done!");
    ExitCode::SUCCESS
}
