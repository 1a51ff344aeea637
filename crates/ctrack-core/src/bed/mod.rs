//! BED interval utilities: coordinate normalization, name deduplication,
//! BED12 loading and scored BED6 output.

mod bed12;
mod dedup;
mod normalize;
mod scored;

pub use bed12::{load_bed12, parse_bed12_line, read_bed12, Bed12Record};
pub use dedup::{dedup_file, dedup_names, DedupStats};
pub use normalize::{
    normalize_file, normalize_line, normalize_stream, CoordinatePolicy, NormalizeStats,
    Normalized, SORTED_OUTPUT,
};
pub use scored::{normalized_scores, write_scored_bed, write_scored_bed_file, ScoredInterval};

use std::io::{self, BufRead};
use thiserror::Error;

/// Field separator of every BED line.
pub const SEPARATOR: u8 = b'\t';

/// Lines starting with `#` are headers/comments and are passed through verbatim.
pub fn is_comment(line: &[u8]) -> bool {
    line.starts_with(b"#")
}

/// Read the next line into `buf` as raw bytes, without its `\n` or `\r\n`.
///
/// Fields beyond the coordinates may hold any bytes (Latin-1 names are common),
/// so lines are never decoded as UTF-8 here. Returns `false` at end of input.
pub(crate) fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// `line` without leading and trailing ASCII whitespace.
pub(crate) fn trim_ascii(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

#[derive(Debug, Error)]
pub enum BedError {
    #[error("line {line}: {column} {value:?} is not a valid integer")]
    InvalidInteger {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
