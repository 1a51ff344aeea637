//! BED6 output with raw scores rescaled into the 0..=1000 BED score range.

use super::Bed12Record;
use crate::storage;
use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

const BED_SCORE_MAX: i64 = 1000;

/// An interval carrying a raw (unscaled) score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub strand: String,
    pub score: f64,
}

impl ScoredInterval {
    pub fn from_bed12(record: &Bed12Record, score: f64) -> Self {
        Self {
            chrom: record.chrom.clone(),
            start: record.chrom_start,
            end: record.chrom_end,
            name: record.name.clone(),
            strand: record.strand.clone(),
            score,
        }
    }
}

/// Min-max rescale: `floor((s - min) / (max - min) * scale)`, clipped to 0..=1000.
///
/// NaN scores map to 0, and so does everything when all finite scores are equal.
pub fn normalized_scores(scores: &[f64], scale: f64) -> Vec<i64> {
    let finite = scores.iter().copied().filter(|s| s.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s), hi.max(s))
    });
    let range = max - min;

    scores
        .iter()
        .map(|&s| {
            if !s.is_finite() || !range.is_finite() || range <= 0.0 {
                return 0;
            }
            let scaled = ((s - min) / range * scale).floor();
            (scaled as i64).clamp(0, BED_SCORE_MAX)
        })
        .collect()
}

/// Write `chrom start end name score strand` lines, no header.
pub fn write_scored_bed<W: Write>(
    intervals: &[ScoredInterval],
    mut writer: W,
    scale: f64,
) -> io::Result<()> {
    let raw: Vec<f64> = intervals.iter().map(|i| i.score).collect();
    for (iv, score) in intervals.iter().zip(normalized_scores(&raw, scale)) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            iv.chrom, iv.start, iv.end, iv.name, score, iv.strand
        )?;
    }
    writer.flush()
}

pub fn write_scored_bed_file(path: &Path, intervals: &[ScoredInterval], scale: f64) -> Result<()> {
    storage::write_atomic(path, |w| Ok(write_scored_bed(intervals, w, scale)?))?;
    tracing::debug!(path = %path.display(), intervals = intervals.len(), "wrote scored BED");
    Ok(())
}
