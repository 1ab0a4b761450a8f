//! Stroke CLI
//!
//! Landmark JSON/YAML → analysis result JSON (+ metadata, schema, presets)

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "stroke")]
#[command(about = "Analyze swim stroke technique from pose landmarks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Analyze one landmark file
    Analyze {
        /// Landmark sequence (JSON or YAML)
        #[arg(long)]
        r#in: PathBuf,

        /// Output result JSON file path
        #[arg(long)]
        out: PathBuf,

        /// Config file (YAML or JSON); overrides --profile
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset name (realistic, sprint, noisy_capture)
        #[arg(long, env = "STROKE_PROFILE")]
        profile: Option<String>,

        /// Frame rate; required for bare frame lists
        #[arg(long)]
        fps: Option<f64>,

        /// Check the written file and re-run to confirm a matching fingerprint
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Analyze many landmark files in parallel
    Batch {
        /// Landmark sequences (JSON or YAML)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for `<stem>.analysis.json` results and the manifest
        #[arg(long)]
        out_dir: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, env = "STROKE_PROFILE")]
        profile: Option<String>,

        #[arg(long)]
        fps: Option<f64>,
    },

    /// Print or write the result JSON schema
    Schema {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print or write a configuration preset as YAML
    Config {
        #[arg(long, env = "STROKE_PROFILE", default_value = "realistic")]
        profile: String,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            r#in,
            out,
            config,
            profile,
            fps,
            verify,
            metadata,
        } => {
            let cfg = stroke_cli::load_config(config.as_deref(), profile.as_deref())?;
            tracing::info!(input = %r#in.display(), out = %out.display(), "analyzing");

            let (result, meta) = stroke_cli::analyze_file(&r#in, &out, &cfg, fps)?;
            print_metadata(&meta);

            if verify {
                verify_result(&r#in, &out, &cfg, fps, &result, &meta)?;
            }

            if let Some(metadata_path) = metadata {
                stroke_cli::write_metadata(&metadata_path, &meta)?;
                eprintln!("Metadata saved to: {}", metadata_path.display());
            }
        }

        Commands::Batch {
            inputs,
            out_dir,
            config,
            profile,
            fps,
        } => {
            let cfg = stroke_cli::load_config(config.as_deref(), profile.as_deref())?;
            let outcomes = stroke_cli::analyze_files(&inputs, &out_dir, &cfg, fps)?;

            let manifest = out_dir.join("manifest.json");
            stroke_cli::emit(&serde_json::to_string_pretty(&outcomes)?, Some(&manifest))?;

            let failures = outcomes.iter().filter(|o| o.error.is_some()).count();
            eprintln!(
                "{} of {} analyses written, manifest: {}",
                outcomes.len() - failures,
                outcomes.len(),
                manifest.display()
            );
            if failures > 0 {
                anyhow::bail!("{failures} input(s) failed");
            }
        }

        Commands::Schema { out } => {
            stroke_cli::emit(&stroke_cli::schema_json()?, out.as_deref())?;
        }

        Commands::Config { profile, out } => {
            let cfg = stroke_cli::load_config(None, Some(&profile))?;
            stroke_cli::emit(&cfg.to_yaml_string()?, out.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &stroke_cli::ResultMetadata) {
    eprintln!("Analysis complete");
    eprintln!("   Frames:      {}", meta.frame_count);
    eprintln!("   Cycles:      {}", meta.cycle_count);
    eprintln!("   Stroke rate: {:.1} spm", meta.stroke_rate);
    eprintln!("   Score:       {:.1} ({:?})", meta.score, meta.grade);
    eprintln!("   Size:        {} bytes", meta.size_bytes);
    eprintln!("   Checksum:    {}", meta.checksum);
}

#[cfg(feature = "cli")]
fn verify_result(
    input: &std::path::Path,
    out: &std::path::Path,
    cfg: &stroke_core::AnalysisConfig,
    fps: Option<f64>,
    result: &stroke_core::AnalysisResult,
    meta: &stroke_cli::ResultMetadata,
) -> Result<()> {
    if !stroke_cli::verify_output(out, &meta.checksum)? {
        anyhow::bail!("Result verification failed - checksum mismatch");
    }
    let sequence = stroke_cli::load_sequence(input, fps)?;
    if !stroke_cli::check_determinism(&sequence, cfg, result)? {
        anyhow::bail!("Result verification failed - repeat analysis gave a different fingerprint");
    }
    eprintln!("Verification passed");
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("stroke CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
