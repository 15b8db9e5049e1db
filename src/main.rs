use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clip_assembler::{
    composition::{CompositionPlanner, FfmpegExecutor, RunOutcome},
    config::{AssemblyConfig, Config},
    video::FfprobeProbe,
    AssemblerError, CompositionMethod,
};

#[derive(Parser)]
#[command(
    name = "clip-assembler",
    version,
    about = "Combine multiple videos with cuts, transitions, or grid layouts",
    long_about = "Clip-Assembler plans a single FFmpeg invocation that joins the given videos in order, \
                  either by direct concatenation, with cross-fade style transitions, or side by side.",
    after_help = methods_help()
)]
struct Cli {
    /// Assembly method, e.g. --simple, --fade, --sidebyside (see METHODS below)
    #[arg(value_name = "METHOD", allow_hyphen_values = true)]
    method: Option<String>,

    /// Video files, in output order
    #[arg(value_name = "VIDEOS")]
    videos: Vec<PathBuf>,

    /// Name of the output file [default: assembled.mp4]
    #[arg(long, value_name = "NAME")]
    output: Option<PathBuf>,

    /// Clip duration before the transition, in seconds (disables auto-adjustment)
    #[arg(long, value_name = "SECS")]
    duration: Option<u32>,

    /// Transition duration, in seconds
    #[arg(long, value_name = "SECS")]
    transition: Option<u32>,

    /// Show the FFmpeg command without running it
    #[arg(long)]
    preview: bool,

    /// Settings file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn methods_help() -> String {
    format!("METHODS:\n{}", CompositionMethod::help_listing())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                return ExitCode::FAILURE;
            }
        },
    };

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<AssemblerError>() {
                Some(err) => err.user_message(),
                None => format!("{:#}", e),
            };
            error!("❌ {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(token) = cli.method else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Resolve the method before anything touches the clips
    let method: CompositionMethod = token.parse().map_err(AssemblerError::from)?;

    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => Config::default(),
    };

    let mut request = AssemblyConfig::new(method, cli.videos, &config.timing).with_preview(cli.preview);
    if let Some(output) = cli.output {
        request = request.with_output(output);
    }
    if let Some(seconds) = cli.duration {
        request = request.with_clip_duration(f64::from(seconds));
    }
    if let Some(seconds) = cli.transition {
        request = request.with_transition_duration(f64::from(seconds));
    }

    let probe = FfprobeProbe::new(config.engine.ffprobe.clone());
    let planner = CompositionPlanner::new(config, probe, FfmpegExecutor::new());
    let report = planner.run(&request).await?;

    if let RunOutcome::Previewed { command_line } = report.outcome {
        println!("\n📋 FFmpeg Command:\n");
        println!("{}", command_line);
        println!("\n(use without --preview to execute)\n");
    }

    Ok(())
}
