//! Balance tables loader.

use std::path::Path;

use anyhow::Context;
use delver_core::BalanceTables;

use crate::loaders::{LoadResult, read_file};

/// Loader for balance tables from RON files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load balance tables from a RON file.
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        let content = read_file(path)?;
        let tables = Self::from_str(&content)
            .with_context(|| format!("Invalid tables file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            materials = tables.materials.len(),
            tiers = tables.vein_tiers.len(),
            "loaded balance tables"
        );
        Ok(tables)
    }

    /// Parse balance tables from RON text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> LoadResult<BalanceTables> {
        let tables: BalanceTables =
            ron::from_str(content).context("Failed to parse balance tables RON")?;
        validate(&tables)?;
        Ok(tables)
    }
}

fn validate(tables: &BalanceTables) -> LoadResult<()> {
    for (material, stats) in &tables.materials {
        anyhow::ensure!(stats.hp > 0, "{material} must have positive hp");
    }
    anyhow::ensure!(tables.player_max_hp > 0, "player_max_hp must be positive");
    anyhow::ensure!(
        tables.starting_tool.dmg > 0,
        "starting tool {} must deal damage",
        tables.starting_tool.name
    );
    for tier in &tables.vein_tiers {
        anyhow::ensure!(
            tier.weights.iter().any(|(_, weight)| *weight > 0),
            "vein tier for level {} has no weighted ore",
            tier.min_level
        );
    }
    Ok(())
}
