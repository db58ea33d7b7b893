//! Deterministic rules for a turn-based mining roguelike.
//!
//! `delver-core` owns the cave, the entities living in it and the turn
//! engine that advances them. It performs no I/O: drivers construct a
//! [`GameState`] from a [`GameConfig`] and [`BalanceTables`], read it through
//! the query surface, and mutate it exclusively through [`GameEngine`].
//! Every random roll draws from the state's seeded [`GameRng`], so a seed
//! plus a key sequence reproduces a session exactly.
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod fov;
pub mod map;
pub mod path;
pub mod state;

pub use config::{CaveConfig, GameConfig, PopulationConfig, VeinConfig};
pub use engine::{
    BumpOutcome, ClimbDirection, EnemyIntent, GEM_SENSOR, GameEngine, GameplayError, Key,
    MineOutcome, PlayerAction,
};
pub use env::{BalanceTables, EnemyStats, GameRng, MaterialStats, ToolStats, VeinTier};
pub use error::{ErrorSeverity, GameError};
pub use fov::{VisibleSet, compute_visibility};
pub use map::{Cell, GenerationError, Map, MapGenerator, Ore, Rect, Terrain, Wall, generate_map};
pub use path::{find_path, next_step};
pub use state::{
    ComponentSet, Direction, EnemyKind, EntityId, GameMode, GameState, InputState, Inventory,
    Material, MessageLog, PendingAction, Position, SelectionEntry,
};
