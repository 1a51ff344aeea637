//! Interval normalization: make every record satisfy `start <= end`.
//!
//! Single pass over the input. Comment lines pass through, blank lines and
//! records with fewer than three fields are dropped, and a record whose start
//! exceeds its end gets its start and end fields swapped (the original text of
//! both fields, not reparsed numbers). All other fields keep their position.

use super::{is_comment, read_line, BedError, SEPARATOR};
use crate::storage;
use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Fixed output filename written by the normalizer.
pub const SORTED_OUTPUT: &str = "sorted_coordinates.bed";

const MIN_FIELDS: usize = 3;

/// How start/end text is turned into something comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Drop every non-digit byte and compare the remaining digits as one number,
    /// so `chr1:100` compares as `1100` and `100bp` as `100`.
    /// A coordinate with no digits at all leaves the record untouched.
    #[default]
    Lenient,
    /// Both coordinates must be plain non-negative integers; anything else is an error.
    Strict,
}

/// Result of normalizing one input line. Fields are raw bytes and are never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<'a> {
    Comment(&'a [u8]),
    Blank,
    /// Fewer than three tab-separated fields; dropped.
    TooFewFields,
    Record { fields: Vec<&'a [u8]>, swapped: bool },
}

impl Normalized<'_> {
    /// The line to emit, if any (without trailing newline).
    pub fn output(&self) -> Option<Vec<u8>> {
        match self {
            Normalized::Comment(line) => Some(line.to_vec()),
            Normalized::Blank | Normalized::TooFewFields => None,
            Normalized::Record { fields, .. } => Some(fields.join(&SEPARATOR)),
        }
    }
}

/// Counters for one normalization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub comments: usize,
    pub blank: usize,
    pub malformed: usize,
    pub unchanged: usize,
    pub swapped: usize,
}

impl NormalizeStats {
    fn record(&mut self, outcome: &Normalized<'_>) {
        match outcome {
            Normalized::Comment(_) => self.comments += 1,
            Normalized::Blank => self.blank += 1,
            Normalized::TooFewFields => self.malformed += 1,
            Normalized::Record { swapped: true, .. } => self.swapped += 1,
            Normalized::Record { swapped: false, .. } => self.unchanged += 1,
        }
    }

    pub fn written(&self) -> usize {
        self.comments + self.unchanged + self.swapped
    }
}

/// Normalize a single line (without its newline). `line_no` is 1-based and only used in errors.
pub fn normalize_line(
    line: &[u8],
    line_no: usize,
    policy: CoordinatePolicy,
) -> Result<Normalized<'_>, BedError> {
    if is_comment(line) {
        return Ok(Normalized::Comment(line));
    }
    if line.is_empty() {
        return Ok(Normalized::Blank);
    }

    let mut fields: Vec<&[u8]> = line.split(|&b| b == SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return Ok(Normalized::TooFewFields);
    }

    let swapped = match compare(fields[1], fields[2], line_no, policy)? {
        Some(Ordering::Greater) => {
            fields.swap(1, 2);
            true
        }
        _ => false,
    };
    Ok(Normalized::Record { fields, swapped })
}

/// Compare start and end. `None` means the pair is not comparable and the record is left alone.
fn compare(
    start: &[u8],
    end: &[u8],
    line_no: usize,
    policy: CoordinatePolicy,
) -> Result<Option<Ordering>, BedError> {
    match policy {
        CoordinatePolicy::Lenient => {
            let (s, e) = (digits_only(start), digits_only(end));
            if s.is_empty() || e.is_empty() {
                return Ok(None);
            }
            Ok(Some(cmp_decimal(&s, &e)))
        }
        CoordinatePolicy::Strict => {
            let s = parse_strict(start, "start", line_no)?;
            let e = parse_strict(end, "end", line_no)?;
            Ok(Some(s.cmp(&e)))
        }
    }
}

fn digits_only(field: &[u8]) -> Vec<u8> {
    field.iter().copied().filter(u8::is_ascii_digit).collect()
}

/// Numeric comparison of two ASCII digit strings of any length.
fn cmp_decimal(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|&b| b != b'0').unwrap_or(digits.len());
    &digits[first..]
}

fn parse_strict(value: &[u8], column: &'static str, line: usize) -> Result<u64, BedError> {
    // Checked byte-wise first: `u64::from_str` accepts a leading '+'.
    if !value.is_empty() && value.iter().all(u8::is_ascii_digit) {
        if let Some(n) = std::str::from_utf8(value).ok().and_then(|s| s.parse::<u64>().ok()) {
            return Ok(n);
        }
    }
    Err(BedError::InvalidInteger {
        line,
        column,
        value: String::from_utf8_lossy(value).into_owned(),
    })
}

/// Normalize every line of `reader` into `writer` (one `\n`-terminated line per emitted record).
pub fn normalize_stream<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    policy: CoordinatePolicy,
) -> Result<NormalizeStats, BedError> {
    let mut stats = NormalizeStats::default();
    let mut buf = Vec::new();
    let mut line_no = 0;
    while read_line(&mut reader, &mut buf)? {
        line_no += 1;
        let outcome = normalize_line(&buf, line_no, policy)?;
        if outcome == Normalized::TooFewFields {
            tracing::debug!(line = line_no, "dropping record with fewer than {} fields", MIN_FIELDS);
        }
        stats.record(&outcome);
        if let Some(out) = outcome.output() {
            writer.write_all(&out)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(stats)
}

/// Normalize `input` into `output`. The output is written to a `.part` file and
/// renamed into place only after the whole input was processed.
pub fn normalize_file(
    input: &Path,
    output: &Path,
    policy: CoordinatePolicy,
) -> Result<NormalizeStats> {
    if !input.is_file() {
        anyhow::bail!("input file not found: {}", input.display());
    }
    let file = File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let stats = storage::write_atomic(output, |w| {
        normalize_stream(BufReader::new(file), w, policy)
            .with_context(|| format!("failed to normalize {}", input.display()))
    })?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        swapped = stats.swapped,
        unchanged = stats.unchanged,
        comments = stats.comments,
        dropped = stats.malformed + stats.blank,
        "normalized intervals"
    );
    Ok(stats)
}
