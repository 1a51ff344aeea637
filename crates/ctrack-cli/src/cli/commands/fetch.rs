//! `ctrack fetch` – download catalog tracks that are not on disk yet.

use anyhow::{Context, Result};
use ctrack_core::config::CtrackConfig;
use ctrack_core::fetch::{self, FetchOptions, FetchOutcome};
use std::path::PathBuf;

pub fn run_fetch(cfg: &CtrackConfig, dir: Option<PathBuf>, sets: &[String]) -> Result<()> {
    let base_dir = dir.unwrap_or_else(|| cfg.tracks_dir.clone());
    let catalog = cfg.catalog().select(sets);
    if catalog.sets.is_empty() {
        anyhow::bail!("no track set matches {:?}", sets);
    }
    catalog.validate().context("invalid track catalog")?;

    let opts = FetchOptions::from(cfg);
    let report = fetch::fetch_catalog(&catalog, &base_dir, &opts, |entry, outcome| {
        match outcome {
            FetchOutcome::Skipped => println!("{} already exists, skipping", entry.filename),
            FetchOutcome::Downloaded { bytes } => {
                println!("Downloaded {} ({} bytes)", entry.filename, bytes)
            }
            FetchOutcome::Failed { error } => {
                println!("Failed to download {}: {}", entry.filename, error)
            }
        }
    })?;

    println!(
        "{} downloaded, {} skipped, {} failed (in {})",
        report.downloaded(),
        report.skipped(),
        report.failed(),
        base_dir.display()
    );
    Ok(())
}
