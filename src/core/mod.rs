//! Core engine types: players, RNG, configuration, errors.
//!
//! These are the building blocks every other module rests on. Nothing
//! here knows about rounds or duels; it is identifiers, storage,
//! deterministic randomness, and the startup contract.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{ConfigError, GameConfig, GameConfigBuilder};
pub use error::GameError;
pub use player::{PlayerId, PlayerMap, PlayerStatus};
pub use rng::{GameRng, GameRngState};
