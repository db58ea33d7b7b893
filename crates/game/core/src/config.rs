/// Game configuration constants and tunable parameters.
///
/// Threaded into [`crate::GameState`] at construction; nothing in the engine
/// reads global state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub map_width: u32,
    pub map_height: u32,
    /// Sight radius used for the player's visibility computation.
    pub fov_radius: u32,

    pub player_stack_limit: usize,
    pub player_inventory_limit: usize,
    pub stockpile_stack_limit: usize,
    pub stockpile_inventory_limit: usize,

    pub cave: CaveConfig,
    pub veins: VeinConfig,
    pub population: PopulationConfig,

    /// Probability that breaking plain rock yields quartz instead.
    pub quartz_chance: f64,
    /// Number of lines retained by the message log.
    pub log_capacity: usize,
    /// Upper bound on random tries for any placement search.
    pub max_placement_attempts: u32,
    /// Mirrors debug-level engine messages into the player message log.
    pub debug_messages: bool,
}

/// Cellular-automaton parameters for cave carving.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaveConfig {
    /// Chance that a cell starts out as floor.
    pub fill_probability: f64,
    pub smoothing_passes: u32,
    /// A wall cell becomes floor with at least this many floor neighbours.
    pub birth_threshold: u8,
    /// A floor cell stays floor with at least this many floor neighbours.
    pub survival_threshold: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VeinConfig {
    pub count: u32,
    pub max_length: u32,
    /// Gems added per level below the first.
    pub gems_per_level: u32,
    pub max_gems: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopulationConfig {
    pub moss_count: u32,
    pub enemies_base: u32,
    pub enemies_per_level: u32,
    /// Elite probability added per level below the first.
    pub elite_chance_per_level: f64,
}

impl GameConfig {
    pub const DEFAULT_MAP_WIDTH: u32 = 80;
    pub const DEFAULT_MAP_HEIGHT: u32 = 40;
    pub const DEFAULT_FOV_RADIUS: u32 = 8;

    pub fn new() -> Self {
        Self {
            map_width: Self::DEFAULT_MAP_WIDTH,
            map_height: Self::DEFAULT_MAP_HEIGHT,
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            player_stack_limit: 5,
            player_inventory_limit: 3,
            stockpile_stack_limit: 99,
            stockpile_inventory_limit: 24,
            cave: CaveConfig::default(),
            veins: VeinConfig::default(),
            population: PopulationConfig::default(),
            quartz_chance: 0.1,
            log_capacity: 6,
            max_placement_attempts: 10_000,
            debug_messages: false,
        }
    }

    pub fn with_map_size(mut self, width: u32, height: u32) -> Self {
        self.map_width = width;
        self.map_height = height;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            fill_probability: 0.5,
            smoothing_passes: 6,
            birth_threshold: 5,
            survival_threshold: 4,
        }
    }
}

impl Default for VeinConfig {
    fn default() -> Self {
        Self {
            count: 25,
            max_length: 10,
            gems_per_level: 3,
            max_gems: 12,
        }
    }
}

impl VeinConfig {
    /// Number of gems seeded on the given dungeon level (none on level 1).
    pub fn gems_for_level(&self, level: u32) -> u32 {
        level
            .saturating_sub(1)
            .saturating_mul(self.gems_per_level)
            .min(self.max_gems)
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            moss_count: 10,
            enemies_base: 2,
            enemies_per_level: 2,
            elite_chance_per_level: 0.1,
        }
    }
}

impl PopulationConfig {
    pub fn enemies_for_level(&self, level: u32) -> u32 {
        self.enemies_base + self.enemies_per_level * level
    }

    pub fn elite_chance(&self, level: u32) -> f64 {
        (self.elite_chance_per_level * f64::from(level.saturating_sub(1))).min(1.0)
    }
}
