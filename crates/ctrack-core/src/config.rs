use crate::catalog::Catalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default write chunk for streamed downloads (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Global configuration loaded from `~/.config/ctrack/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtrackConfig {
    /// Base directory track files are downloaded into (relative paths resolve against the cwd).
    pub tracks_dir: PathBuf,
    /// Size in bytes of each buffered write while streaming a track to disk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Optional catalog override; if missing, the built-in PhyloCSF/PhyloP sets are used.
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for CtrackConfig {
    fn default() -> Self {
        Self {
            tracks_dir: PathBuf::from("data/conservation"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            catalog: None,
        }
    }
}

impl CtrackConfig {
    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Catalog {
        self.catalog.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ctrack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CtrackConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<CtrackConfig> {
    if !path.exists() {
        let default_cfg = CtrackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: CtrackConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    if cfg.chunk_size == 0 {
        anyhow::bail!("invalid config {}: chunk_size must be > 0", path.display());
    }
    if let Some(catalog) = &cfg.catalog {
        catalog
            .validate()
            .with_context(|| format!("invalid catalog in {}", path.display()))?;
    }
    Ok(cfg)
}
