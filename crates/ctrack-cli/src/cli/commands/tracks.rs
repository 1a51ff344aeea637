//! `ctrack tracks` – list catalog tracks and whether they are on disk.

use anyhow::Result;
use ctrack_core::config::CtrackConfig;
use std::path::PathBuf;

pub fn run_tracks(cfg: &CtrackConfig, dir: Option<PathBuf>) -> Result<()> {
    let base_dir = dir.unwrap_or_else(|| cfg.tracks_dir.clone());
    let entries = cfg.catalog().entries();
    if entries.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }
    println!("{:<8} {:<40} {}", "STATE", "FILE", "URL");
    for e in entries {
        let dest = e.destination(&base_dir);
        let state = if dest.exists() { "present" } else { "missing" };
        println!(
            "{:<8} {:<40} {}",
            state,
            format!("{}/{}", e.subdir, e.filename),
            e.url
        );
    }
    Ok(())
}
