//! Typed BED12 records.

use super::{is_comment, read_line, trim_ascii, BedError, SEPARATOR};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

const BED12_FIELDS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bed12Record {
    pub chrom: String,
    pub chrom_start: u64,
    pub chrom_end: u64,
    pub name: String,
    pub score: i64,
    pub strand: String,
    pub thick_start: u64,
    pub thick_end: u64,
    /// Kept as text: both `0` and `255,0,0` occur in the wild.
    pub item_rgb: String,
    pub block_count: u64,
    pub block_sizes: Vec<u64>,
    pub block_starts: Vec<u64>,
}

impl Bed12Record {
    /// Interval length on the reference.
    pub fn span(&self) -> u64 {
        self.chrom_end.saturating_sub(self.chrom_start)
    }
}

fn int<T: FromStr>(value: &str, column: &'static str, line: usize) -> Result<T, BedError> {
    value.trim().parse::<T>().map_err(|_| BedError::InvalidInteger {
        line,
        column,
        value: value.to_string(),
    })
}

/// Comma-separated integer list; a trailing comma is allowed (`10,20,`).
fn int_list(value: &str, column: &'static str, line: usize) -> Result<Vec<u64>, BedError> {
    value
        .trim()
        .trim_end_matches(',')
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| int(s, column, line))
        .collect()
}

/// Parse one BED12 data line. `line_no` is 1-based and only used in errors.
pub fn parse_bed12_line(line: &str, line_no: usize) -> Result<Bed12Record, BedError> {
    let f: Vec<&str> = line.split(char::from(SEPARATOR)).collect();
    if f.len() != BED12_FIELDS {
        return Err(BedError::FieldCount {
            line: line_no,
            expected: BED12_FIELDS,
            found: f.len(),
        });
    }
    Ok(Bed12Record {
        chrom: f[0].to_string(),
        chrom_start: int(f[1], "chromStart", line_no)?,
        chrom_end: int(f[2], "chromEnd", line_no)?,
        name: f[3].to_string(),
        score: int(f[4], "score", line_no)?,
        strand: f[5].to_string(),
        thick_start: int(f[6], "thickStart", line_no)?,
        thick_end: int(f[7], "thickEnd", line_no)?,
        item_rgb: f[8].to_string(),
        block_count: int(f[9], "blockCount", line_no)?,
        block_sizes: int_list(f[10], "blockSizes", line_no)?,
        block_starts: int_list(f[11], "blockStarts", line_no)?,
    })
}

/// Header lines that carry no record.
fn is_header(line: &[u8]) -> bool {
    is_comment(line) || line.starts_with(b"track") || line.starts_with(b"browser")
}

/// Read all records, skipping blank and header lines.
///
/// Text columns that are not valid UTF-8 are decoded lossily (invalid bytes
/// become U+FFFD) instead of failing the whole file.
pub fn read_bed12<R: BufRead>(mut reader: R) -> Result<Vec<Bed12Record>, BedError> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;
    while read_line(&mut reader, &mut buf)? {
        line_no += 1;
        if trim_ascii(&buf).is_empty() || is_header(&buf) {
            continue;
        }
        records.push(parse_bed12_line(&String::from_utf8_lossy(&buf), line_no)?);
    }
    Ok(records)
}

pub fn load_bed12(path: &Path) -> Result<Vec<Bed12Record>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records =
        read_bed12(BufReader::new(file)).with_context(|| format!("invalid BED12 {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded BED12");
    Ok(records)
}
