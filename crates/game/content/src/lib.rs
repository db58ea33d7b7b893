//! Data-driven content for the mining game.
//!
//! This crate turns data files into the values the engine is constructed
//! from:
//! - Game configuration (TOML): map size, cave shape, population, limits
//! - Balance tables (RON): material toughness, enemy and tool stats, prices
//!
//! Content is read once at startup and handed to
//! [`delver_core::GameState::new`]; it never appears in game state itself.
//! The stock files live under `data/` and are embedded as
//! [`DEFAULT_CONFIG`] and [`DEFAULT_TABLES`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, TablesLoader};

/// Stock game configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../data/config.toml");

/// Stock balance tables.
pub const DEFAULT_TABLES: &str = include_str!("../data/tables.ron");
