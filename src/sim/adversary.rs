//! Autonomous adversaries
//!
//! Walkers patrol toward the player, reverse or hop at walls, avoid ledges,
//! and occasionally jump on their own. A minority "leaper" variant shares the
//! same state machine with a different parameter preset - no subtyping, just
//! data.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision;
use super::state::{Block, Body, Rect};
use crate::consts::*;

/// Render hint for the variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Crimson,
    Magenta,
}

/// Behavior preset fixed at spawn time
#[derive(Debug, Clone, Copy)]
pub struct BehaviorParams {
    pub jump_force: f32,
    /// Independent per-tick chance of a spontaneous jump while grounded
    pub jump_probability: f64,
    /// Ticks that must pass after a jump before the next roll
    pub min_ground_dwell: u32,
    pub palette: Palette,
}

impl BehaviorParams {
    pub const WALKER: Self = Self {
        jump_force: -8.0,
        jump_probability: 0.02,
        min_ground_dwell: 60,
        palette: Palette::Crimson,
    };

    pub const LEAPER: Self = Self {
        jump_force: -15.0,
        jump_probability: 0.015,
        min_ground_dwell: 90,
        palette: Palette::Magenta,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct Adversary {
    pub body: Body,
    pub dead: bool,
    /// True for the leaper preset (worth a heal when defeated)
    pub special: bool,
    pub params: BehaviorParams,
    jumping: bool,
    ticks_since_jump: u32,
}

impl Adversary {
    /// Spawn at the given position, walking left. A fixed fraction of spawns
    /// roll the leaper preset.
    pub fn spawn(x: f32, y: f32, rng: &mut Pcg32) -> Self {
        let special = rng.random_bool(SPECIAL_SPAWN_CHANCE);
        let params = if special {
            BehaviorParams::LEAPER
        } else {
            BehaviorParams::WALKER
        };
        let mut body = Body::new(Rect::new(x, y, ADVERSARY_SIZE, ADVERSARY_SIZE));
        body.vel.x = -ADVERSARY_SPEED;
        Self {
            body,
            dead: false,
            special,
            params,
            jumping: false,
            ticks_since_jump: 0,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// One frame of autonomous behavior against the current block set.
    pub fn update(&mut self, blocks: &[Block], rng: &mut Pcg32) {
        if self.dead {
            return;
        }

        self.body.vel.y += ADVERSARY_GRAVITY;
        self.ticks_since_jump = self.ticks_since_jump.saturating_add(1);

        let hit_wall = collision::sweep_horizontal(&mut self.body, blocks);
        if hit_wall {
            if rng.random_bool(TURN_PROBABILITY) {
                self.body.vel.x = -self.body.vel.x;
            } else {
                self.try_jump();
            }
        }

        let contact = collision::sweep_vertical(&mut self.body, blocks);
        if contact.landed {
            self.jumping = false;
            // Spontaneous hop, gated by the post-jump dwell time
            if !hit_wall
                && self.ticks_since_jump > self.params.min_ground_dwell
                && rng.random_bool(self.params.jump_probability)
            {
                self.try_jump();
            }
        }
        if contact.falling_contact {
            self.jumping = false;
        }

        // Turn before walking off a ledge
        if !self.jumping && !hit_wall && !collision::ground_ahead(&self.body, blocks) {
            self.body.vel.x = -self.body.vel.x;
        }
    }

    fn try_jump(&mut self) {
        if !self.jumping {
            self.jumping = true;
            self.ticks_since_jump = 0;
            self.body.vel.y = self.params.jump_force;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BlockKind;
    use rand::SeedableRng;

    fn platform(x: f32, y: f32, tiles: usize) -> Vec<Block> {
        (0..tiles)
            .map(|i| Block {
                rect: Rect::new(x + i as f32 * TILE, y, TILE, TILE),
                kind: BlockKind::Platform,
            })
            .collect()
    }

    /// Grounded adversary standing on `blocks` at x
    fn grounded_at(x: f32, top: f32, vel_x: f32) -> Adversary {
        let mut a = Adversary::spawn(x, top - ADVERSARY_SIZE, &mut Pcg32::seed_from_u64(42));
        a.special = false;
        a.params = BehaviorParams::WALKER;
        a.body.vel.x = vel_x;
        a
    }

    #[test]
    fn test_ledge_turn_happens_once() {
        // Three-tile platform; adversary walks right toward the edge
        let blocks = platform(0.0, 132.0, 3);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut a = grounded_at(70.0, 132.0, ADVERSARY_SPEED);

        a.update(&blocks, &mut rng);
        assert_eq!(a.body.vel.x, -ADVERSARY_SPEED, "no ground ahead: reverse");

        // Walking back over the platform, it must not flip again
        let x_after_turn = a.body.rect.x;
        a.update(&blocks, &mut rng);
        assert_eq!(a.body.vel.x, -ADVERSARY_SPEED);
        assert!(a.body.rect.x < x_after_turn);
    }

    #[test]
    fn test_wall_contact_reverses_or_jumps() {
        // A pipe directly in the walking path
        let mut blocks = platform(0.0, 132.0, 8);
        blocks.push(Block {
            rect: Rect::new(128.0, 132.0 - 64.0, 64.0, 64.0),
            kind: BlockKind::Pipe,
        });

        for seed in 0..24 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut a = grounded_at(98.0, 132.0, ADVERSARY_SPEED);
            a.update(&blocks, &mut rng);
            assert!(
                a.body.vel.x < 0.0 || a.is_jumping(),
                "seed {seed}: wall must trigger a reverse or a jump"
            );
        }
    }

    #[test]
    fn test_spontaneous_jump_respects_dwell() {
        let blocks = platform(0.0, 132.0, 32);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut a = grounded_at(400.0, 132.0, -ADVERSARY_SPEED);
        // Certain jump once the dwell gate opens
        a.params.jump_probability = 1.0;
        a.params.min_ground_dwell = 5;

        for _ in 0..5 {
            a.update(&blocks, &mut rng);
            assert!(!a.is_jumping());
        }
        a.update(&blocks, &mut rng);
        assert!(a.is_jumping());
    }

    #[test]
    fn test_dead_adversary_is_inert() {
        let blocks = platform(0.0, 132.0, 4);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut a = grounded_at(40.0, 132.0, ADVERSARY_SPEED);
        a.dead = true;
        let before = a.body;
        a.update(&blocks, &mut rng);
        assert_eq!(before.rect, a.body.rect);
    }
}
