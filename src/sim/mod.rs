//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - One tick per host frame, per-frame velocity units
//! - Seeded RNG only (owned by `GameState`)
//! - Tick-counted timers, no wall clock
//! - No rendering or platform dependencies

pub mod adversary;
pub mod collision;
pub mod level;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;

pub use adversary::{Adversary, BehaviorParams, Palette};
pub use level::ChunkGenerator;
pub use particles::{MAX_PARTICLES, Particle, ParticleClass, ParticleSystem};
pub use player::Player;
pub use state::{Block, BlockKind, Body, GameEvent, GamePhase, GameState, Rect};
pub use tick::{InputEvent, tick};
