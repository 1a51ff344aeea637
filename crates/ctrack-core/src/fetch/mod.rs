//! Sequential fetcher for the track catalog.
//!
//! Each entry is resolved to `<base>/<subdir>/<Prefix>_<name>.bw`. Existing files
//! are skipped without touching the network; everything else is fetched with a
//! streamed GET, one track at a time. A failed track is reported and the run
//! moves on.

mod error;
mod headers;
mod single;

pub use error::FetchError;
pub use single::download_track;

use crate::catalog::{Catalog, TrackEntry};
use crate::config::{CtrackConfig, DEFAULT_CHUNK_SIZE};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

/// Transfer knobs. No overall timeout, no retry.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Write buffer and curl receive buffer size in bytes.
    pub chunk_size: usize,
    pub connect_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&CtrackConfig> for FetchOptions {
    fn from(cfg: &CtrackConfig) -> Self {
        Self {
            chunk_size: cfg.chunk_size,
            ..Self::default()
        }
    }
}

/// What happened to one catalog entry.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Destination already existed; no request was made.
    Skipped,
    Downloaded { bytes: u64 },
    Failed { error: FetchError },
}

#[derive(Debug)]
pub struct FetchItem {
    pub entry: TrackEntry,
    pub outcome: FetchOutcome,
}

/// Per-item results of a fetch run, in catalog order.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub items: Vec<FetchItem>,
}

impl FetchReport {
    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Downloaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }
}

/// Fetch one entry into `base_dir`, skipping it if the destination exists.
pub fn fetch_entry(entry: &TrackEntry, base_dir: &Path, opts: &FetchOptions) -> FetchOutcome {
    let dest = entry.destination(base_dir);
    if dest.exists() {
        tracing::debug!(track = %entry.filename, "already present, skipping");
        return FetchOutcome::Skipped;
    }

    tracing::info!(track = %entry.filename, url = %entry.url, "downloading");
    match download_track(&entry.url, &dest, opts) {
        Ok(bytes) => {
            tracing::info!(track = %entry.filename, bytes, "downloaded");
            FetchOutcome::Downloaded { bytes }
        }
        Err(error) => {
            tracing::warn!(track = %entry.filename, url = %entry.url, "download failed: {}", error);
            FetchOutcome::Failed { error }
        }
    }
}

/// Fetch every entry of `catalog` under `base_dir`, calling `on_item` as each one finishes.
///
/// Only failing to create the target directories is fatal; per-track failures
/// end up in the report.
pub fn fetch_catalog(
    catalog: &Catalog,
    base_dir: &Path,
    opts: &FetchOptions,
    mut on_item: impl FnMut(&TrackEntry, &FetchOutcome),
) -> Result<FetchReport> {
    let mut report = FetchReport::default();
    for set in &catalog.sets {
        let dir = base_dir.join(&set.subdir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create track directory {}", dir.display()))?;

        for entry in set.entries() {
            let outcome = fetch_entry(&entry, base_dir, opts);
            on_item(&entry, &outcome);
            report.items.push(FetchItem { entry, outcome });
        }
    }
    tracing::info!(
        downloaded = report.downloaded(),
        skipped = report.skipped(),
        failed = report.failed(),
        "fetch finished"
    );
    Ok(report)
}
