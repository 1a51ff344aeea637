//! CLI command handlers, one per file.

mod dedup_names;
mod fetch;
mod sort_coords;
mod tracks;

pub use dedup_names::run_dedup_names;
pub use fetch::run_fetch;
pub use sort_coords::run_sort_coords;
#[cfg(test)]
pub use sort_coords::run_sort_coords_in;
pub use tracks::run_tracks;
