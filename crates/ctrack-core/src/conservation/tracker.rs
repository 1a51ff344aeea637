//! Per-region score lookup across the PhyloCSF frame tracks and PhyloP.

use super::layout::{phylocsf_filename, PhyloCsfKind, Strand, FRAMES};
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// An opened signal track (e.g. a bigWig reader).
pub trait ScoreSource {
    /// Length of `chrom`, or `None` if the track has no such chromosome.
    fn chrom_length(&self, chrom: &str) -> Option<u64>;

    /// Per-base values over `[start, end)`. Missing data is `NaN`.
    fn values(&self, chrom: &str, start: u64, end: u64) -> Result<Vec<f64>>;
}

/// Scores for one region: PhyloCSF values keyed by frame, plus PhyloP.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionScores {
    pub phylocsf: BTreeMap<u8, Vec<f64>>,
    pub phylop: Option<Vec<f64>>,
}

/// UCSC-style chromosome name: `1` becomes `chr1`, `chr1` stays.
pub fn ucsc_chrom(chrom: &str) -> Cow<'_, str> {
    if chrom.starts_with("chr") {
        Cow::Borrowed(chrom)
    } else {
        Cow::Owned(format!("chr{}", chrom))
    }
}

pub struct ConservationTracker<S> {
    kind: PhyloCsfKind,
    phylocsf: HashMap<(Strand, u8), S>,
    phylop: S,
}

impl<S: ScoreSource> ConservationTracker<S> {
    pub fn new(kind: PhyloCsfKind, phylocsf: HashMap<(Strand, u8), S>, phylop: S) -> Self {
        Self {
            kind,
            phylocsf,
            phylop,
        }
    }

    /// Open the PhyloCSF frame tracks found in `phylocsf_dir` (missing ones are skipped)
    /// and the PhyloP track at `phylop_path`, using `open` to turn a path into a source.
    pub fn open<F>(
        phylocsf_dir: &Path,
        phylop_path: &Path,
        kind: PhyloCsfKind,
        mut open: F,
    ) -> Result<Self>
    where
        F: FnMut(&Path) -> Result<S>,
    {
        let mut phylocsf = HashMap::new();
        for frame in FRAMES {
            for strand in [Strand::Plus, Strand::Minus] {
                let path = phylocsf_dir.join(phylocsf_filename(kind, strand, frame));
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "PhyloCSF track not present");
                    continue;
                }
                let source =
                    open(&path).with_context(|| format!("failed to open {}", path.display()))?;
                phylocsf.insert((strand, frame), source);
            }
        }
        let phylop = open(phylop_path)
            .with_context(|| format!("failed to open {}", phylop_path.display()))?;
        tracing::info!(
            kind = kind.prefix(),
            frames = phylocsf.len(),
            "conservation tracks opened"
        );
        Ok(Self::new(kind, phylocsf, phylop))
    }

    pub fn kind(&self) -> PhyloCsfKind {
        self.kind
    }

    /// Number of (strand, frame) PhyloCSF tracks available.
    pub fn phylocsf_tracks(&self) -> usize {
        self.phylocsf.len()
    }

    /// PhyloCSF scores of every available frame on `strand`, plus PhyloP, over `[start, end)`.
    pub fn conservation_scores(
        &self,
        chrom: &str,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> RegionScores {
        let mut phylocsf = BTreeMap::new();
        for frame in FRAMES {
            if let Some(track) = self.phylocsf.get(&(strand, frame)) {
                if let Some(scores) = region_scores(track, chrom, start, end) {
                    phylocsf.insert(frame, scores);
                }
            }
        }
        RegionScores {
            phylocsf,
            phylop: region_scores(&self.phylop, chrom, start, end),
        }
    }
}

/// Values of one track, or `None` if the chromosome is unknown, the region is out
/// of bounds, or the source fails (logged).
fn region_scores<S: ScoreSource>(track: &S, chrom: &str, start: u64, end: u64) -> Option<Vec<f64>> {
    let chrom = ucsc_chrom(chrom);
    let length = track.chrom_length(&chrom)?;
    if start > end || end > length {
        return None;
    }
    match track.values(&chrom, start, end) {
        Ok(values) => Some(values),
        Err(e) => {
            tracing::warn!("error reading track for {}:{}-{}: {:#}", chrom, start, end, e);
            None
        }
    }
}
