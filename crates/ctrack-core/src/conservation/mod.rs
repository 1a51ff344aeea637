//! Conservation scores over genomic regions.
//!
//! Track files follow the fetcher's naming (`PhyloCSFRaw_plus1.bw`, ...). Reading
//! the bigWig payload is left to a [`ScoreSource`] implementation; this module
//! only decides which tracks to consult and what to compute from their values.

mod layout;
mod metrics;
mod tracker;

pub use layout::{phylocsf_filename, PhyloCsfKind, Strand, FRAMES};
pub use metrics::{ConservationAnalyzer, Metrics, DEFAULT_WINDOW_SIZE, START_VALUES};
pub use tracker::{ucsc_chrom, ConservationTracker, RegionScores, ScoreSource};
