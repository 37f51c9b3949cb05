//! oxide-annotate CLI
//!
//! Command-line tool for adding, updating and removing schema annotations.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_annotate::prelude::*;

/// Keeps schema annotation comments in ORM model files in sync.
#[derive(Parser)]
#[command(name = "oxide-annotate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, env = "ANNOTATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or update the annotation in the given files.
    Annotate {
        /// File holding the rendered annotation block.
        #[arg(short, long)]
        block: PathBuf,

        /// Kind of the given files, selecting their position setting.
        #[arg(short, long, value_enum, default_value = "class")]
        kind: FileKind,

        /// Position for this kind: before, top, after or bottom.
        #[arg(short, long, env = "ANNOTATE_POSITION")]
        position: Option<Position>,

        /// Regenerate even when columns are unchanged.
        #[arg(short, long, env = "ANNOTATE_FORCE")]
        force: bool,

        /// Fail instead of writing when a file needs an update.
        #[arg(long, env = "ANNOTATE_FROZEN")]
        frozen: bool,

        /// Marker line written before the annotation.
        #[arg(long, env = "ANNOTATE_WRAPPER_OPEN")]
        wrapper_open: Option<String>,

        /// Marker line written after the annotation.
        #[arg(long, env = "ANNOTATE_WRAPPER_CLOSE")]
        wrapper_close: Option<String>,

        /// Files to annotate.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove the annotation from the given files.
    Remove {
        /// Marker line written before the annotation.
        #[arg(long, env = "ANNOTATE_WRAPPER_OPEN")]
        wrapper_open: Option<String>,

        /// Files to deannotate.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut options = match &cli.config {
        Some(path) => AnnotateOptions::from_json_file(path)?,
        None => AnnotateOptions::new(),
    };

    let report = match cli.command {
        Commands::Annotate {
            block,
            kind,
            position,
            force,
            frozen,
            wrapper_open,
            wrapper_close,
            files,
        } => {
            if let Some(position) = position {
                options = options.with_position_for(kind, position);
            }
            options.force |= force;
            options.frozen |= frozen;
            if wrapper_open.is_some() {
                options.wrapper_open = wrapper_open;
            }
            if wrapper_close.is_some() {
                options.wrapper_close = wrapper_close;
            }

            let block = std::fs::read_to_string(&block)
                .with_context(|| format!("Failed to read annotation block {}", block.display()))?;
            let targets: Vec<AnnotationTarget> = files
                .into_iter()
                .map(|path| AnnotationTarget::new(path, kind, block.clone()))
                .collect();

            Annotator::new(options)?.annotate_all(&targets)?
        }

        Commands::Remove {
            wrapper_open,
            files,
        } => {
            if wrapper_open.is_some() {
                options.wrapper_open = wrapper_open;
            }
            Annotator::new(options)?.remove_all(&files)?
        }
    };

    info!("{report}");
    if !report.is_ok() {
        info!("{} file(s) could not be processed", report.failures.len());
    }

    Ok(())
}
