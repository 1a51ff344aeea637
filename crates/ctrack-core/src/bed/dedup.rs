//! Make the BED `name` column (4th field) unique.
//!
//! The first occurrence of a name is kept, the n-th repeat becomes
//! `<name>_dup<n-1>`. Lines are trimmed of surrounding whitespace; lines with
//! fewer than four fields are written back trimmed but otherwise untouched.
//! Names are compared as raw bytes.

use super::{is_comment, read_line, trim_ascii, BedError, SEPARATOR};
use crate::storage;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

const NAME_FIELD: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub lines: usize,
    pub renamed: usize,
}

pub fn dedup_names<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<DedupStats, BedError> {
    let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
    let mut stats = DedupStats::default();
    let mut buf = Vec::new();

    while read_line(&mut reader, &mut buf)? {
        stats.lines += 1;
        if is_comment(&buf) {
            writer.write_all(&buf)?;
            writer.write_all(b"\n")?;
            continue;
        }

        let mut fields: Vec<Vec<u8>> = trim_ascii(&buf)
            .split(|&b| b == SEPARATOR)
            .map(<[u8]>::to_vec)
            .collect();
        if fields.len() > NAME_FIELD {
            let seen = counts.entry(fields[NAME_FIELD].clone()).or_insert(0);
            *seen += 1;
            if *seen > 1 {
                let suffix = format!("_dup{}", *seen - 1);
                fields[NAME_FIELD].extend_from_slice(suffix.as_bytes());
                stats.renamed += 1;
            }
        }
        writer.write_all(&fields.join(&SEPARATOR))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(stats)
}

/// Deduplicate names of `input` into `output` (written atomically).
pub fn dedup_file(input: &Path, output: &Path) -> Result<DedupStats> {
    if !input.is_file() {
        anyhow::bail!("input file not found: {}", input.display());
    }
    let file = File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let stats = storage::write_atomic(output, |w| {
        dedup_names(BufReader::new(file), w)
            .with_context(|| format!("failed to deduplicate {}", input.display()))
    })?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        renamed = stats.renamed,
        "deduplicated BED names"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (String, DedupStats) {
        let mut out = Vec::new();
        let stats = dedup_names(input.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn repeats_get_dup_suffix() {
        let input = "c\t1\t2\ta\nc\t3\t4\ta\nc\t5\t6\tb\nc\t7\t8\ta\n";
        let (out, stats) = run(input);
        assert_eq!(
            out,
            "c\t1\t2\ta\nc\t3\t4\ta_dup1\nc\t5\t6\tb\nc\t7\t8\ta_dup2\n"
        );
        assert_eq!(stats, DedupStats { lines: 4, renamed: 2 });
    }

    #[test]
    fn short_lines_and_whitespace() {
        let (out, stats) = run("  c\t1\t2  \n\n");
        assert_eq!(out, "c\t1\t2\n\n");
        assert_eq!(stats.renamed, 0);
    }

    #[test]
    fn other_columns_preserved() {
        let (out, _) = run("c\t1\t2\tx\t0\t+\nd\t3\t4\tx\t9\t-\n");
        assert_eq!(out, "c\t1\t2\tx\t0\t+\nd\t3\t4\tx_dup1\t9\t-\n");
    }

    #[test]
    fn comments_are_not_counted() {
        let (out, _) = run("#a\tb\tc\tx\nc\t1\t2\tx\n");
        assert_eq!(out, "#a\tb\tc\tx\nc\t1\t2\tx\n");
    }

    #[test]
    fn non_utf8_names_are_counted_bytewise() {
        let mut out = Vec::new();
        let input = b"c\t1\t2\tg\xe9ne\nc\t3\t4\tg\xe9ne\nc\t5\t6\tok\n";
        let stats = dedup_names(&input[..], &mut out).unwrap();
        assert_eq!(
            out,
            b"c\t1\t2\tg\xe9ne\nc\t3\t4\tg\xe9ne_dup1\nc\t5\t6\tok\n".to_vec()
        );
        assert_eq!(stats, DedupStats { lines: 3, renamed: 1 });
    }

    #[test]
    fn dedup_file_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bed");
        let output = dir.path().join("out.bed");
        std::fs::write(&input, "c\t1\t2\tg\nc\t1\t2\tg\n").unwrap();
        let stats = dedup_file(&input, &output).unwrap();
        assert_eq!(stats.renamed, 1);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "c\t1\t2\tg\nc\t1\t2\tg_dup1\n"
        );
    }
}
