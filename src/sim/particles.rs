//! Decorative particle bursts
//!
//! Short-lived physics bodies spawned on kills, hits and heals. They follow
//! the same integration convention as everything else (per-frame velocities,
//! y-down gravity) but never collide; they exist for the renderer.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Size/color family of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleClass {
    Small,
    Medium,
    Large,
    Heal,
}

impl ParticleClass {
    fn roll_size(&self, rng: &mut Pcg32) -> f32 {
        match self {
            ParticleClass::Small => 2.0 + rng.random_range(0.0..2.0),
            ParticleClass::Medium => 4.0 + rng.random_range(0.0..3.0),
            ParticleClass::Large => 6.0 + rng.random_range(0.0..4.0),
            ParticleClass::Heal => 4.0 + rng.random_range(0.0..4.0),
        }
    }

    fn decay(&self) -> f32 {
        match self {
            ParticleClass::Small => 0.02,
            ParticleClass::Medium => 0.015,
            ParticleClass::Large => 0.01,
            ParticleClass::Heal => 0.01,
        }
    }

    /// Number of hues the renderer maps this class onto
    pub fn hue_count(&self) -> u8 {
        match self {
            ParticleClass::Heal => 6,
            _ => 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in (0, 1]; doubles as render alpha
    pub life: f32,
    pub size: f32,
    pub class: ParticleClass,
    /// Index into the class's color table, fixed at spawn
    pub hue: u8,
    decay: f32,
}

/// Hard cap on live particles; oldest are dropped first
pub const MAX_PARTICLES: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawn a layered explosion: dense center layers plus an offset ring,
    /// all with a slight upward bias.
    pub fn burst(&mut self, center: Vec2, count: usize, class: ParticleClass, rng: &mut Pcg32) {
        for share in [0.4, 0.3, 0.3] {
            self.layer(center, (count as f32 * share) as usize, class, rng);
        }

        let ring = count / 2;
        for i in 0..ring {
            let angle = std::f32::consts::TAU * i as f32 / ring.max(1) as f32;
            let speed = 1.0 + rng.random_range(0.0..3.0);
            let distance = 20.0 + rng.random_range(0.0..20.0);
            self.push(Particle {
                pos: center + Vec2::new(angle.cos(), angle.sin()) * distance,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0),
                life: 1.0,
                size: class.roll_size(rng),
                class,
                hue: rng.random_range(0..class.hue_count()),
                decay: class.decay(),
            });
        }
    }

    fn layer(&mut self, center: Vec2, count: usize, class: ParticleClass, rng: &mut Pcg32) {
        for i in 0..count {
            let angle =
                std::f32::consts::TAU * i as f32 / count.max(1) as f32 + rng.random_range(0.0..0.5);
            let speed = 2.0 + rng.random_range(0.0..3.0);
            self.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 1.0),
                life: 1.0,
                size: class.roll_size(rng),
                class,
                hue: rng.random_range(0..class.hue_count()),
                decay: class.decay(),
            });
        }
    }

    fn push(&mut self, p: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(p);
    }

    /// Integrate and expire. Particles feel a light gravity pull.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += 0.1;
            p.life -= p.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_burst_spawns_and_decays_out() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut system = ParticleSystem::new();
        system.burst(Vec2::new(100.0, 100.0), 40, ParticleClass::Medium, &mut rng);
        assert!(!system.is_empty());

        // Medium decay is 0.015: gone within 67 updates
        for _ in 0..70 {
            system.update();
        }
        assert!(system.is_empty());
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut system = ParticleSystem::new();
        for _ in 0..40 {
            system.burst(Vec2::ZERO, 50, ParticleClass::Small, &mut rng);
        }
        assert!(system.len() <= MAX_PARTICLES);
    }

    #[test]
    fn test_hue_within_class_table() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut system = ParticleSystem::new();
        system.burst(Vec2::ZERO, 30, ParticleClass::Heal, &mut rng);
        for p in system.particles() {
            assert_eq!(p.class, ParticleClass::Heal);
            assert!(p.hue < ParticleClass::Heal.hue_count());
        }
    }
}
