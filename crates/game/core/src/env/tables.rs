use std::collections::BTreeMap;

use crate::state::{EnemyKind, Material};

/// Balance data: how tough each material is, enemy and tool stats, and what
/// the workshop pays for goods.
///
/// The tables are plain data threaded into the engine at construction. They
/// define no rules of their own; the map generator and turn engine look
/// values up here.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTables {
    /// Wall stats keyed by the material a broken wall drops.
    pub materials: BTreeMap<Material, MaterialStats>,
    pub normal_enemy: EnemyStats,
    pub elite_enemy: EnemyStats,
    pub starting_tool: ToolStats,
    pub player_max_hp: i32,
    pub sale_values: BTreeMap<Material, i64>,
    /// Ore mix per depth; the deepest tier whose `min_level` is reached wins.
    pub vein_tiers: Vec<VeinTier>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialStats {
    pub hp: i32,
    pub hardness: i32,
}

impl MaterialStats {
    pub const fn new(hp: i32, hardness: i32) -> Self {
        Self { hp, hardness }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyStats {
    pub hp: i32,
    pub damage: i32,
}

impl EnemyStats {
    pub const fn new(hp: i32, damage: i32) -> Self {
        Self { hp, damage }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToolStats {
    pub name: String,
    pub dmg: i32,
    pub hardness: i32,
}

impl ToolStats {
    pub fn new(name: impl Into<String>, dmg: i32, hardness: i32) -> Self {
        Self {
            name: name.into(),
            dmg,
            hardness,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VeinTier {
    pub min_level: u32,
    /// Ore materials and their relative weights.
    pub weights: Vec<(Material, u32)>,
}

impl BalanceTables {
    /// Fallback used when a material is missing from the table.
    pub const ROCK: MaterialStats = MaterialStats::new(10, 1);

    pub fn new() -> Self {
        let materials = BTreeMap::from([
            (Material::Rock, Self::ROCK),
            (Material::CopperOre, MaterialStats::new(10, 1)),
            (Material::IronOre, MaterialStats::new(15, 1)),
            (Material::MithrilOre, MaterialStats::new(20, 2)),
            (Material::Gem, MaterialStats::new(15, 2)),
        ]);
        let sale_values = BTreeMap::from([(Material::Quartz, 1), (Material::Gem, 25)]);
        let vein_tiers = vec![
            VeinTier {
                min_level: 1,
                weights: vec![(Material::CopperOre, 1)],
            },
            VeinTier {
                min_level: 2,
                weights: vec![(Material::CopperOre, 3), (Material::IronOre, 2)],
            },
            VeinTier {
                min_level: 3,
                weights: vec![
                    (Material::CopperOre, 2),
                    (Material::IronOre, 2),
                    (Material::MithrilOre, 1),
                ],
            },
        ];

        Self {
            materials,
            normal_enemy: EnemyStats::new(2, 1),
            elite_enemy: EnemyStats::new(5, 2),
            starting_tool: ToolStats::new("pick", 3, 1),
            player_max_hp: 10,
            sale_values,
            vein_tiers,
        }
    }

    pub fn material(&self, material: Material) -> MaterialStats {
        self.materials.get(&material).copied().unwrap_or(Self::ROCK)
    }

    pub fn enemy(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Normal => self.normal_enemy,
            EnemyKind::Elite => self.elite_enemy,
        }
    }

    pub fn sale_value(&self, material: Material) -> Option<i64> {
        self.sale_values.get(&material).copied()
    }

    /// Weighted ore mix for a dungeon level. Empty when no tier applies.
    pub fn vein_mix(&self, level: u32) -> &[(Material, u32)] {
        self.vein_tiers
            .iter()
            .filter(|tier| tier.min_level <= level)
            .max_by_key(|tier| tier.min_level)
            .map(|tier| tier.weights.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for BalanceTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vein_mix_deepens_with_level() {
        let tables = BalanceTables::new();
        assert_eq!(tables.vein_mix(1), &[(Material::CopperOre, 1)]);
        assert_eq!(tables.vein_mix(2).len(), 2);
        assert!(
            tables
                .vein_mix(7)
                .iter()
                .any(|(material, _)| *material == Material::MithrilOre)
        );
        assert!(tables.vein_mix(0).is_empty());
    }

    #[test]
    fn unknown_materials_fall_back_to_rock() {
        let tables = BalanceTables::new();
        assert_eq!(tables.material(Material::Moss), BalanceTables::ROCK);
        assert_eq!(tables.material(Material::MithrilOre).hardness, 2);
        assert_eq!(tables.enemy(EnemyKind::Elite), EnemyStats::new(5, 2));
        assert_eq!(tables.sale_value(Material::Quartz), Some(1));
        assert_eq!(tables.sale_value(Material::Rock), None);
    }
}
