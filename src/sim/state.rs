//! Game state and core simulation types
//!
//! Everything the per-frame tick reads and writes lives here. The state owns
//! its RNG so a run is fully reproducible from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::adversary::Adversary;
use super::level::ChunkGenerator;
use super::particles::ParticleSystem;
use super::player::Player;
use crate::consts::*;

/// Axis-aligned box in world coordinates (x grows rightward unbounded,
/// y grows downward). Invariant: w, h > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Standard AABB overlap test (strict inequalities, symmetric)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Shared mover contract: a rectangle plus a per-frame velocity.
///
/// The player, adversaries and particles all integrate the same way; the
/// collision sweeps in `sim::collision` operate on this shape.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub rect: Rect,
    pub vel: Vec2,
}

impl Body {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
        }
    }
}

/// Block roles assigned by generation. Physics ignores the tag; rendering
/// and the overlap filter care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Ground,
    Platform,
    Pipe,
    Bonus,
}

/// A static world rectangle
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub rect: Rect,
    pub kind: BlockKind,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Splash,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for confirm to reset
    GameOver,
}

/// Things that happened during a tick, for the shell to present
/// (percussive hits, flashes). Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    AdversaryStomped,
    AdversarySlashed,
    PlayerHurt,
    PlayerHealed,
    PlayerDied,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Tick counter; the only clock the simulation knows
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Left edge of the viewport in world coordinates
    pub camera_x: f32,
    pub player: Player,
    pub adversaries: Vec<Adversary>,
    pub blocks: Vec<Block>,
    pub particles: ParticleSystem,
    pub generator: ChunkGenerator,
    pub ticks_since_spawn: u32,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session with the given seed, on the splash screen.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Splash,
            score: 0,
            camera_x: 0.0,
            player: Player::new(),
            adversaries: Vec::new(),
            blocks: Vec::new(),
            particles: ParticleSystem::new(),
            generator: ChunkGenerator::new(GROUND_Y),
            ticks_since_spawn: 0,
            events: Vec::new(),
        }
    }

    /// Tear down the run and return to the splash screen. The next run gets
    /// a seed drawn from the current stream so layouts vary between runs
    /// while the whole session stays reproducible from the original seed.
    pub fn reset(&mut self) {
        let next_seed: u64 = self.rng.random();
        *self = Self::new(next_seed);
    }

    /// Adversaries currently inside the viewport (live or not-yet-evicted)
    pub fn visible_adversaries(&self) -> usize {
        self.adversaries
            .iter()
            .filter(|a| a.body.rect.x >= self.camera_x && a.body.rect.x <= self.camera_x + VIEW_W)
            .count()
    }
}
