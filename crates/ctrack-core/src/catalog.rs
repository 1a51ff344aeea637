//! Track catalog: the fixed sets of conservation tracks and where they land on disk.
//!
//! A catalog is plain data passed into the fetcher. The built-in one covers the
//! hg38 PhyloCSF (raw and smoothed, six frames each) and PhyloP 100-way tracks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of every track file.
pub const TRACK_EXTENSION: &str = "bw";

const PHYLOCSF_BASE: &str = "https://data.broadinstitute.org/compbio1/PhyloCSFtracks/hg38/latest";
const PHYLOP_URL: &str =
    "https://hgdownload.soe.ucsc.edu/goldenPath/hg38/phyloP100way/hg38.phyloP100way.bw";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid {what} {value:?}: must be non-empty and free of path separators")]
    InvalidComponent { what: &'static str, value: String },
    #[error("track {name:?} has invalid URL {url:?}: {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
    #[error("duplicate destination {0}")]
    DuplicateDestination(String),
}

/// One logical track inside a set: name plus source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSource {
    pub name: String,
    pub url: String,
}

/// A group of tracks sharing a filename prefix and a subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSet {
    /// Filename prefix, e.g. `PhyloCSFRaw`.
    pub prefix: String,
    /// Subdirectory of the tracks dir the files are written into.
    pub subdir: String,
    pub tracks: Vec<TrackSource>,
}

/// A resolved track: logical name, source URL and destination filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub name: String,
    pub url: String,
    pub subdir: String,
    pub filename: String,
}

impl TrackEntry {
    /// Destination path of this track below `base_dir`.
    pub fn destination(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.subdir).join(&self.filename)
    }
}

/// Destination filename for a track: `<Prefix>_<name>.bw`.
pub fn track_filename(prefix: &str, name: &str) -> String {
    format!("{}_{}.{}", prefix, name, TRACK_EXTENSION)
}

impl TrackSet {
    pub fn entries(&self) -> impl Iterator<Item = TrackEntry> + '_ {
        self.tracks.iter().map(move |t| TrackEntry {
            name: t.name.clone(),
            url: t.url.clone(),
            subdir: self.subdir.clone(),
            filename: track_filename(&self.prefix, &t.name),
        })
    }
}

/// Ordered list of track sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub sets: Vec<TrackSet>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            sets: vec![
                phylocsf_set("PhyloCSFRaw", "PhyloCSFRaw"),
                phylocsf_set("PhyloCSFSmooth", "PhyloCSF"),
                TrackSet {
                    prefix: "PhyloP".to_string(),
                    subdir: "phylop".to_string(),
                    tracks: vec![TrackSource {
                        name: "100way".to_string(),
                        url: PHYLOP_URL.to_string(),
                    }],
                },
            ],
        }
    }
}

/// Six PhyloCSF frame tracks (`plus1..plus3`, `minus1..minus3`); remote files are `<stem>+1.bw` etc.
fn phylocsf_set(prefix: &str, remote_stem: &str) -> TrackSet {
    let mut tracks = Vec::with_capacity(6);
    for (sign, symbol) in [("plus", '+'), ("minus", '-')] {
        for frame in 1..=3 {
            tracks.push(TrackSource {
                name: format!("{}{}", sign, frame),
                url: format!("{}/{}{}{}.bw", PHYLOCSF_BASE, remote_stem, symbol, frame),
            });
        }
    }
    TrackSet {
        prefix: prefix.to_string(),
        subdir: "phylocsf".to_string(),
        tracks,
    }
}

impl Catalog {
    /// All entries in catalog order.
    pub fn entries(&self) -> Vec<TrackEntry> {
        self.sets.iter().flat_map(|s| s.entries()).collect()
    }

    /// Restrict the catalog to the sets whose prefix is in `prefixes` (case-insensitive).
    /// An empty slice keeps everything.
    pub fn select(&self, prefixes: &[String]) -> Catalog {
        if prefixes.is_empty() {
            return self.clone();
        }
        Catalog {
            sets: self
                .sets
                .iter()
                .filter(|s| prefixes.iter().any(|p| p.eq_ignore_ascii_case(&s.prefix)))
                .cloned()
                .collect(),
        }
    }

    /// Check names, URLs and destination uniqueness.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for set in &self.sets {
            check_component("prefix", &set.prefix)?;
            check_component("subdir", &set.subdir)?;
            for track in &set.tracks {
                check_component("track name", &track.name)?;
                check_url(&track.name, &track.url)?;
            }
            for entry in set.entries() {
                let dest = format!("{}/{}", entry.subdir, entry.filename);
                if !seen.insert(dest.clone()) {
                    return Err(CatalogError::DuplicateDestination(dest));
                }
            }
        }
        Ok(())
    }
}

fn check_component(what: &'static str, value: &str) -> Result<(), CatalogError> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if bad {
        return Err(CatalogError::InvalidComponent {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_url(name: &str, url: &str) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidUrl {
        name: name.to_string(),
        url: url.to_string(),
        reason,
    };
    let parsed = url::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {}", other))),
    }
}
