//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use delver_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Missing keys fall back to [`GameConfig::default`], so a file only needs
/// the values it changes.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config = Self::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Parse config data from TOML text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &GameConfig) -> LoadResult<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.cave.fill_probability),
        "cave.fill_probability must be within [0, 1], got {}",
        config.cave.fill_probability
    );
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.quartz_chance),
        "quartz_chance must be within [0, 1], got {}",
        config.quartz_chance
    );
    anyhow::ensure!(
        config.player_stack_limit > 0 && config.player_inventory_limit > 0,
        "player inventory limits must be positive"
    );
    anyhow::ensure!(
        config.max_placement_attempts > 0,
        "max_placement_attempts must be positive"
    );
    Ok(())
}
