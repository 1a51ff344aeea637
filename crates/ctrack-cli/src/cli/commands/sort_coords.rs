//! `ctrack sort-coords` – normalize BED intervals so that start <= end.

use anyhow::Result;
use ctrack_core::bed::{self, CoordinatePolicy, SORTED_OUTPUT};
use std::path::Path;

/// Normalize `input` into `sorted_coordinates.bed` in the current directory.
pub fn run_sort_coords(input: &Path, strict: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    run_sort_coords_in(input, strict, &cwd)
}

pub fn run_sort_coords_in(input: &Path, strict: bool, out_dir: &Path) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!(
            "input file not found: {}\nUsage: ctrack sort-coords <input.bed>",
            input.display()
        );
    }
    let policy = if strict {
        CoordinatePolicy::Strict
    } else {
        CoordinatePolicy::Lenient
    };
    let output = out_dir.join(SORTED_OUTPUT);
    let stats = bed::normalize_file(input, &output, policy)?;
    println!(
        "Coordinates sorted: {} swapped, {} unchanged, {} dropped. Output written to {}",
        stats.swapped,
        stats.unchanged,
        stats.blank + stats.malformed,
        SORTED_OUTPUT
    );
    Ok(())
}
