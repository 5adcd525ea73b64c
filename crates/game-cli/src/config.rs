use std::io::Read;
use std::ops::RangeInclusive;

use anyhow::{bail, Context};
use serde::Deserialize;

/// Board sizes selectable at reset time. The engine itself accepts any
/// side length; this bound is enforced at the orchestrator boundary only.
pub const BOARD_SIZES: RangeInclusive<usize> = 3..=9;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    /// Side length of the board, one of 3..=9.
    #[serde(default = "defaults::board_size")]
    pub board_size: usize,

    /// RNG seed for reproducible games. Omit for entropy seeding.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject sizes the presentation layer never offers.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !BOARD_SIZES.contains(&self.board_size) {
            bail!(
                "board_size must be between {} and {}, got {}",
                BOARD_SIZES.start(),
                BOARD_SIZES.end(),
                self.board_size
            );
        }
        Ok(())
    }
}

mod defaults {
    pub fn board_size() -> usize {
        4
    }
}
