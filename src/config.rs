use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Optional YAML config; every field falls back to a default so the
/// file may be absent or partial.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the per-day markdown files. Defaults to the
    /// platform data directory.
    pub journal_dir: Option<PathBuf>,
    /// Day-strip tile width in terminal cells.
    pub tile_width: usize,
    /// Gap between day-strip tiles in terminal cells.
    pub tile_gap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            journal_dir: None,
            tile_width: 12,
            tile_gap: 1,
        }
    }
}

pub fn load() -> Result<Config> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    serde_yaml::from_str(&data).with_context(|| format!("parsing {:?}", path))
}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "daybook").map(|dirs| dirs.config_dir().join("config.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config = serde_yaml::from_str("journal_dir: /tmp/journal\n").unwrap();
        assert_eq!(config.journal_dir, Some(PathBuf::from("/tmp/journal")));
        assert_eq!(config.tile_width, 12);
        assert_eq!(config.tile_gap, 1);
    }

    #[test]
    fn empty_mapping_is_the_default_config() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.journal_dir.is_none());
    }
}
