//! `ctrack dedup-names` – make BED names unique.

use anyhow::Result;
use ctrack_core::bed;
use std::path::Path;

pub fn run_dedup_names(input: &Path, output: &Path) -> Result<()> {
    let stats = bed::dedup_file(input, output)?;
    println!(
        "Renamed {} duplicate name(s) in {} line(s); output written to {}",
        stats.renamed,
        stats.lines,
        output.display()
    );
    Ok(())
}
