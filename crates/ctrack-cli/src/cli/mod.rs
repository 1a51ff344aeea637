//! CLI for ctrack.

mod commands;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use ctrack_core::config;
use std::path::PathBuf;

use commands::{run_dedup_names, run_fetch, run_sort_coords, run_tracks};

/// Top-level CLI for ctrack.
#[derive(Debug, Parser)]
#[command(name = "ctrack", version)]
#[command(about = "Conservation track fetcher and BED interval utilities", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download PhyloCSF/PhyloP track files that are not already present.
    Fetch {
        /// Base directory for track files (default: `tracks_dir` from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Only fetch the set with this prefix (repeatable), e.g. `--set PhyloP`.
        #[arg(long = "set", value_name = "PREFIX")]
        sets: Vec<String>,
    },

    /// List catalog tracks and whether each file is present.
    Tracks {
        /// Base directory for track files (default: `tracks_dir` from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Swap start/end of reversed BED intervals; writes sorted_coordinates.bed in the current directory.
    SortCoords {
        /// Input BED file.
        input: PathBuf,
        /// Fail on non-numeric coordinates instead of stripping non-digits.
        #[arg(long)]
        strict: bool,
    },

    /// Make BED names (4th column) unique by suffixing repeats with `_dupN`.
    DedupNames {
        /// Input BED file.
        input: PathBuf,
        /// Output BED file.
        output: PathBuf,
    },
}

/// Exit status for a failed parse: help/version exit 0, every other usage error exits 1.
fn parse_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(e.kind()));
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = parse_args();

        match cli.command {
            CliCommand::Fetch { dir, sets } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch(&cfg, dir, &sets)?;
            }
            CliCommand::Tracks { dir } => {
                let cfg = config::load_or_init()?;
                run_tracks(&cfg, dir)?;
            }
            CliCommand::SortCoords { input, strict } => run_sort_coords(&input, strict)?,
            CliCommand::DedupNames { input, output } => run_dedup_names(&input, &output)?,
        }

        Ok(())
    }
}
