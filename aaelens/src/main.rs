//! `aaelens` command line
//!
//! ```bash
//! # every diagnostic with the default configuration
//! aaelens all
//!
//! # accuracy of a 10-class model over the first 20 batches
//! aaelens accuracy --n-classes 10 --max-batches 20
//!
//! # 16 sampled digits of class 3
//! aaelens generate --label 3 --count 16 --seed 7
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use aaelens::config::{ConfigOverrides, VisualizerConfig};
use aaelens::logging;
use aaelens::render::PngSink;
use aaelens::session::Session;

#[derive(Parser, Debug)]
#[command(name = "aaelens")]
#[command(version)]
#[command(about = "Diagnostic figures for a semi-supervised adversarial autoencoder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every diagnostic in order
    All,
    /// Histograms of the latent y maximum and the first latent z component
    LatentDist,
    /// Histogram and counts of predicted labels
    LabelDist,
    /// Unsupervised clustering accuracy
    Accuracy,
    /// Decoded images while sweeping the first latent z component
    Traverse,
    /// Output of the mode decoder for every class
    Modes,
    /// Class modes next to samples predicted as that class
    Samples,
    /// Images next to their reconstructions
    Reconstruct,
    /// Decode digits of one class from random styles
    Generate {
        #[arg(long)]
        label: usize,
        #[arg(long, default_value_t = 16)]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = VisualizerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply(&cli.overrides);
    config.validate()?;
    tracing::debug!(?config, "effective configuration");

    let session = Session::load(config.clone())
        .with_context(|| format!("loading models and data from {}", config.data_dir.display()))?;
    let mut sink = PngSink::new(&config.output_dir)?;
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::All => {
            let summary = session.run_all(&mut sink, &mut stdout)?;
            tracing::info!(figures = summary.figures, "all diagnostics finished");
        }
        Command::LatentDist => {
            session.latent_distribution(&mut sink)?;
        }
        Command::LabelDist => {
            session.label_distribution(&mut sink, &mut stdout)?;
        }
        Command::Accuracy => {
            session.accuracy(&mut stdout)?;
        }
        Command::Traverse => session.latent_features(&mut sink)?,
        Command::Modes => session.learned_modes(&mut sink)?,
        Command::Samples => {
            session.class_samples(&mut sink)?;
        }
        Command::Reconstruct => {
            session.reconstructions(&mut sink)?;
        }
        Command::Generate { label, count } => session
            .generate(&mut sink, label, count)
            .with_context(|| format!("generating digits for label {label}"))?,
    }

    println!("figures written to {}", config.output_dir.display());
    Ok(())
}
