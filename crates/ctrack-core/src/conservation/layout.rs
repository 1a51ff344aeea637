use crate::catalog::track_filename;
use std::fmt;
use std::str::FromStr;

/// Reading frames covered by PhyloCSF tracks.
pub const FRAMES: [u8; 3] = [1, 2, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    /// Word used in track filenames.
    pub fn word(self) -> &'static str {
        match self {
            Strand::Plus => "plus",
            Strand::Minus => "minus",
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            other => Err(format!("invalid strand {:?}: expected '+' or '-'", other)),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        })
    }
}

/// Which PhyloCSF score flavour to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhyloCsfKind {
    #[default]
    Raw,
    Smooth,
}

impl PhyloCsfKind {
    pub fn prefix(self) -> &'static str {
        match self {
            PhyloCsfKind::Raw => "PhyloCSFRaw",
            PhyloCsfKind::Smooth => "PhyloCSFSmooth",
        }
    }
}

/// `PhyloCSF<Kind>_<plus|minus><frame>.bw`, the name the fetcher writes.
pub fn phylocsf_filename(kind: PhyloCsfKind, strand: Strand, frame: u8) -> String {
    track_filename(kind.prefix(), &format!("{}{}", strand.word(), frame))
}
