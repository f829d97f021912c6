// Framesight CLI binary

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use framesight_lib::backend::fixture::FixedBackend;
use framesight_lib::backend::probe::FfprobeInspector;
use framesight_lib::backend::sampler::FfmpegFrameSampler;
use framesight_lib::backend::ImageRef;
use framesight_lib::batch::BatchRunner;
use framesight_lib::config::EngineConfig;
use framesight_lib::constants::DEFAULT_FRAME_INTERVAL_SECS;
use framesight_lib::tagging::EnvironmentTagger;
use framesight_lib::validation::SceneValidator;

#[derive(Parser)]
#[command(name = "framesight")]
#[command(about = "Framesight - environment tagging and scene validation for media pipelines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag the environment in a single image
    Tag {
        /// Image file to analyze
        image: PathBuf,
        /// Configuration override file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a single image against quality rules
    Validate {
        /// Image file to validate
        image: PathBuf,
        /// Configuration override file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Tag every image in a directory
    Batch {
        /// Directory containing images
        directory: PathBuf,
        /// Write results as pretty JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration override file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Tag sampled frames of a video
    Video {
        /// Video file to sample
        video: PathBuf,
        /// Seconds between sampled frames
        #[arg(long, default_value_t = DEFAULT_FRAME_INTERVAL_SECS)]
        interval: u64,
        /// Write results as pretty JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration override file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tag { image, config } => cmd_tag(image, config),
        Commands::Validate { image, config } => cmd_validate(image, config),
        Commands::Batch { directory, output, config } => cmd_batch(directory, output, config),
        Commands::Video { video, interval, output, config } => {
            cmd_video(video, interval, output, config)
        }
    }
}

/// Tagger wired to the dry-run inference backend.
fn make_tagger(config: &EngineConfig) -> EnvironmentTagger {
    EnvironmentTagger::new(config.clone(), Box::new(FixedBackend), Box::new(FixedBackend))
}

fn cmd_tag(image: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = EngineConfig::load(config.as_deref());
    let tagger = make_tagger(&config);

    let outcome = tagger.tag_environment(&ImageRef::new(&image));
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

fn cmd_validate(image: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = EngineConfig::load(config.as_deref());
    let validator =
        SceneValidator::new(config, Box::new(FixedBackend), Box::new(FfprobeInspector));

    let report = validator.validate_scene(&ImageRef::new(&image));
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();
    println!("Overall score: {:.2}", report.overall_score);

    Ok(())
}

fn cmd_batch(directory: PathBuf, output: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = EngineConfig::load(config.as_deref());
    let runner = BatchRunner::new(make_tagger(&config), Box::new(FfmpegFrameSampler::new()?));

    let results = runner.batch_tag(&directory, output.as_deref())?;
    let failed = results.values().filter(|o| o.is_failed()).count();

    println!("Batch complete:");
    println!("  Images tagged: {}", results.len() - failed);
    println!("  Failed:        {}", failed);
    if let Some(ref output) = output {
        println!("  Results:       {}", output.display());
    }

    Ok(())
}

fn cmd_video(
    video: PathBuf,
    interval: u64,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = EngineConfig::load(config.as_deref());
    let runner = BatchRunner::new(make_tagger(&config), Box::new(FfmpegFrameSampler::new()?));

    let results = runner.tag_video_scenes(&video, interval, output.as_deref())?;
    let failed = results.values().filter(|o| o.is_failed()).count();

    println!("Video scan complete ({}s interval):", interval);
    println!("  Frames tagged: {}", results.len() - failed);
    println!("  Failed:        {}", failed);
    if let Some(ref output) = output {
        println!("  Results:       {}", output.display());
    }

    Ok(())
}
