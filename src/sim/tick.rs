//! Per-frame simulation step
//!
//! One host animation frame equals one tick; velocities are per-frame, so
//! there is no accumulator or timestep correction. Each tick runs, in order:
//! level extension, spawning, the player's integration and sweeps, adversary
//! updates, contact resolution, particles, and the game-over check.

use super::adversary::Adversary;
use super::collision;
use super::particles::ParticleClass;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Discrete intent events delivered by the input collaborator. `Confirm` is
/// the single phase-transition trigger (splash -> playing, game over ->
/// reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
    Jump,
    Attack,
    Confirm,
}

impl GameState {
    /// Apply one input event. Intent mutates velocity directly, so damage
    /// knockback keeps the player drifting until the next intent event,
    /// exactly like holding no key would.
    pub fn handle_input(&mut self, event: InputEvent) {
        match self.phase {
            GamePhase::Splash => {
                if event == InputEvent::Confirm {
                    self.phase = GamePhase::Playing;
                }
            }
            GamePhase::GameOver => {
                if event == InputEvent::Confirm {
                    self.reset();
                }
            }
            GamePhase::Playing => match event {
                InputEvent::MoveLeftStart => self.player.set_move(-1.0),
                InputEvent::MoveRightStart => self.player.set_move(1.0),
                InputEvent::MoveLeftStop | InputEvent::MoveRightStop => self.player.set_move(0.0),
                InputEvent::Jump => {
                    self.player.jump();
                }
                InputEvent::Attack => {
                    // Slash follows the current movement direction
                    let dir = self.player.body.vel.x;
                    if dir != 0.0 {
                        self.player.start_slash(dir.signum());
                    }
                }
                InputEvent::Confirm => {}
            },
        }
    }
}

/// Advance the simulation by one frame.
pub fn tick(state: &mut GameState) {
    state.events.clear();
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    // Polled windows: invulnerability, slash expiry, charge regen
    state.player.tick_timers();

    // Extend the world ahead of the player, drop what's far behind
    let reach = state.player.body.rect.x;
    let new_blocks = state.generator.extend(reach, &mut state.rng);
    state.blocks.extend(new_blocks);
    let keep_from = reach - VIEW_W;
    state.blocks.retain(|b| b.rect.x > keep_from);

    // Camera leads by a third of the viewport, never backs past the origin
    state.camera_x = (state.player.body.rect.x - VIEW_W / 3.0).max(0.0);

    spawn_adversaries(state);

    // Player integration: gravity, then the shared axis-separated sweeps
    let prev_bottom = state.player.body.rect.bottom();
    state.player.body.vel.y += PLAYER_GRAVITY;
    collision::sweep_horizontal(&mut state.player.body, &state.blocks);
    let contact = collision::sweep_vertical(&mut state.player.body, &state.blocks);
    if contact.landed || contact.falling_contact {
        state.player.jumping = false;
    }

    // Adversaries act against the same block set
    let GameState {
        adversaries,
        blocks,
        rng,
        ..
    } = state;
    for adversary in adversaries.iter_mut() {
        adversary.update(blocks, rng);
    }

    resolve_contacts(state, prev_bottom);

    // Rainbow trail while slashing
    if state.player.is_slashing() && state.time_ticks % 3 == 0 {
        let center = state.player.body.rect.center();
        state
            .particles
            .burst(center, 30, ParticleClass::Small, &mut state.rng);
    }

    // Evict the dead and the left-behind
    let evict_before = state.camera_x - VIEW_W;
    state
        .adversaries
        .retain(|a| !a.dead && a.body.rect.x > evict_before);

    state.particles.update();

    if state.player.health == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::PlayerDied);
    }
}

/// Spawn a new adversary just off-screen to the right whenever the interval
/// has elapsed and fewer than the cap are inside the viewport.
fn spawn_adversaries(state: &mut GameState) {
    state.ticks_since_spawn = state.ticks_since_spawn.saturating_add(1);
    if state.ticks_since_spawn < SPAWN_INTERVAL_TICKS
        || state.visible_adversaries() >= MAX_VISIBLE_ADVERSARIES
    {
        return;
    }
    let x = state.player.body.rect.x + VIEW_W;
    let adversary = Adversary::spawn(x, GROUND_Y - ADVERSARY_SIZE, &mut state.rng);
    state.adversaries.push(adversary);
    state.ticks_since_spawn = 0;
}

/// Resolve player/adversary overlaps. A slash kills unconditionally; a
/// descending contact from above is a stomp kill with a reduced rebound;
/// anything else hurts the player. Defeating a leaper restores health.
fn resolve_contacts(state: &mut GameState, prev_bottom: f32) {
    let player_rect = state.player.body.rect;

    for i in 0..state.adversaries.len() {
        if state.adversaries[i].dead {
            continue;
        }
        if !player_rect.overlaps(&state.adversaries[i].body.rect) {
            continue;
        }

        let adv_top = state.adversaries[i].body.rect.y;
        let adv_center = state.adversaries[i].body.rect.center();
        let special = state.adversaries[i].special;

        if state.player.is_slashing() {
            state.adversaries[i].dead = true;
            state.score += 1;
            state.events.push(GameEvent::AdversarySlashed);
            for _ in 0..2 {
                state
                    .particles
                    .burst(adv_center, 50, ParticleClass::Medium, &mut state.rng);
            }
            heal_from_special(state, special);
        } else if state.player.body.vel.y > 0.0 && prev_bottom <= adv_top {
            state.adversaries[i].dead = true;
            state.player.body.vel.y = JUMP_IMPULSE * STOMP_BOUNCE;
            state.score += 1;
            state.events.push(GameEvent::AdversaryStomped);
            if special {
                heal_from_special(state, special);
            } else {
                state
                    .particles
                    .burst(adv_center, 50, ParticleClass::Medium, &mut state.rng);
            }
        } else if state.player.take_damage(&mut state.rng) {
            state.events.push(GameEvent::PlayerHurt);
            let center = state.player.body.rect.center();
            for _ in 0..3 {
                state
                    .particles
                    .burst(center, 100, ParticleClass::Medium, &mut state.rng);
            }
        }
    }
}

fn heal_from_special(state: &mut GameState, special: bool) {
    if special && state.player.recover_health() {
        state.events.push(GameEvent::PlayerHealed);
        let center = state.player.body.rect.center();
        for _ in 0..3 {
            state
                .particles
                .burst(center, 40, ParticleClass::Heal, &mut state.rng);
        }
    }
}
