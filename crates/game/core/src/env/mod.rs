//! Read-only inputs to the simulation.
//!
//! Balance tables and the deterministic random stream. The engine takes both
//! by value at construction; nothing here is global.
mod rng;
mod tables;

pub use rng::GameRng;
pub use tables::{BalanceTables, EnemyStats, MaterialStats, ToolStats, VeinTier};
