use anyhow::Context;
use clap::Parser;
use gcodeview::{
    format_summary, init_logging, CallbackTracer, CancelToken, ExtrusionMode,
    GcodeReconstructor, ReconstructConfig, SlicedGcode, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "gcodeview",
    about = "Reconstruct the motion model of sliced 3D-printer G-code"
)]
struct Cli {
    /// Input G-code file
    input: PathBuf,

    /// Reconstruction config (.toml or .json); defaults to the user config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force an extrusion mode instead of the one detected from the preamble
    #[arg(long, value_parser = parse_extrusion_mode)]
    extrusion: Option<ExtrusionMode>,

    /// Print the model as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Write output to a file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_extrusion_mode(s: &str) -> Result<ExtrusionMode, String> {
    match s.to_lowercase().as_str() {
        "absolute" | "m82" => Ok(ExtrusionMode::Absolute),
        "relative" | "m83" => Ok(ExtrusionMode::Relative),
        _ => Err(format!("Unknown extrusion mode: {s}. Use: absolute, relative")),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    debug!("gcodeview {} (built {})", VERSION, BUILD_DATE);

    let mut config = ReconstructConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load reconstruction config")?;
    if cli.extrusion.is_some() {
        config.extrusion_mode = cli.extrusion;
    }

    let sliced = SlicedGcode::from_file(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    info!(
        "Loaded {} ({} layers)",
        cli.input.display(),
        sliced.layer_count()
    );

    let reconstructor = GcodeReconstructor::new(config)?;
    let mut tracer = CallbackTracer::new(CancelToken::new())
        .with_progress(Box::new(|fraction| {
            debug!("Reconstruction progress: {:.0}%", fraction * 100.0)
        }))
        .with_failure(Box::new(|message| warn!("Reconstruction failed: {}", message)));
    let model = reconstructor.reconstruct(&sliced, &mut tracer)?;

    let report = if cli.json {
        model.to_json(cli.pretty)?
    } else {
        format_summary(&model)
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", report),
    }

    Ok(())
}
