//! Rift Runner - an endless side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, physics, collisions, actors)
//! - `audio`: Self-clocked music sequencer and tone synthesis
//! - `renderer`: Canvas2D presentation (wasm only)
//! - `highscores`: Persisted top score
//! - `settings`: User preferences

pub mod audio;
pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::TopScore;
pub use settings::Settings;

/// Game tuning constants
///
/// Velocities and accelerations are in pixels per frame at the host's
/// animation cadence (nominally 60 Hz); durations are in ticks.
pub mod consts {
    /// Viewport dimensions (world units == CSS pixels)
    pub const VIEW_W: f32 = 800.0;
    pub const VIEW_H: f32 = 600.0;
    /// Top edge of the ground row
    pub const GROUND_Y: f32 = VIEW_H - 100.0;

    /// Block grid size
    pub const TILE: f32 = 32.0;
    /// Horizontal span of one generated chunk
    pub const CHUNK_W: f32 = 800.0;

    /// Player
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_GRAVITY: f32 = 0.8;
    pub const JUMP_IMPULSE: f32 = -15.0;
    pub const MAX_HEALTH: u8 = 6;
    /// Invulnerability window after a hit (1.5 s at 60 Hz)
    pub const INVULN_TICKS: u32 = 90;
    /// Knockback on damage: fixed magnitude, extra upward lift
    pub const KNOCKBACK_SPEED: f32 = 15.0;
    pub const KNOCKBACK_LIFT: f32 = -10.0;
    /// Stomp kill rebounds at a fraction of the jump impulse
    pub const STOMP_BOUNCE: f32 = 0.7;

    /// Slash attack
    pub const MAX_SLASH_ENERGY: f32 = 100.0;
    pub const SLASH_CHARGE_RATE: f32 = 0.2;
    pub const SLASH_SPEED: f32 = 25.0;
    pub const SLASH_TICKS: u32 = 30;

    /// Adversaries
    pub const ADVERSARY_SIZE: f32 = 32.0;
    pub const ADVERSARY_SPEED: f32 = 2.0;
    pub const ADVERSARY_GRAVITY: f32 = 0.5;
    /// Chance to reverse (rather than jump) on a wall hit
    pub const TURN_PROBABILITY: f64 = 0.6;
    /// Fraction of spawns that use the leaper preset
    pub const SPECIAL_SPAWN_CHANCE: f64 = 0.1;
    pub const SPAWN_INTERVAL_TICKS: u32 = 180;
    pub const MAX_VISIBLE_ADVERSARIES: usize = 3;

    /// Slack for contact-edge classification in the vertical sweep
    pub const CONTACT_TOLERANCE: f32 = 5.0;
}
