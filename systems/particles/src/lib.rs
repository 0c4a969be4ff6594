#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded pool of cosmetic particles.
//!
//! Particles never affect gameplay. Emission past [`MAX_PARTICLES`] is
//! dropped silently, and the random stream is seeded so replays stay
//! reproducible.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use macan_run_core::{Facing, Rgb, MAX_PARTICLES};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PARTICLE_GRAVITY: f32 = 300.0;

/// Default tint of bursts.
pub const BURST_COLOR: Rgb = Rgb::from_rgb(255, 200, 0);
const TRAIL_COLOR: Rgb = Rgb::from_rgb(200, 200, 200);
const DUST_COLOR: Rgb = Rgb::from_rgb(150, 150, 150);
const SPARKLE_COLOR: Rgb = Rgb::from_rgb(255, 223, 0);
const DAMAGE_COLOR: Rgb = Rgb::from_rgb(255, 50, 50);

/// A single short-lived speck.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    color: Rgb,
    age: f32,
    lifetime: f32,
    size: f32,
    initial_size: f32,
}

impl Particle {
    fn new(position: Vec2, velocity: Vec2, color: Rgb, lifetime: f32, size: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            age: 0.0,
            lifetime,
            size,
            initial_size: size,
        }
    }

    /// Ages the particle, returning `false` once it has expired.
    fn update(&mut self, dt: f32) -> bool {
        self.age += dt;
        if self.age >= self.lifetime {
            return false;
        }
        self.velocity.y += PARTICLE_GRAVITY * dt;
        self.position += self.velocity * dt;
        self.size = self.initial_size * (1.0 - (self.age / self.lifetime) * 0.5);
        true
    }

    /// World position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Tint.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Seconds since emission.
    #[must_use]
    pub const fn age(&self) -> f32 {
        self.age
    }

    /// Seconds the particle lives.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Current diameter; shrinks to half over the lifetime.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Fraction of the lifetime already spent, for fading.
    #[must_use]
    pub fn life_ratio(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Owner of every live particle.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: ChaCha8Rng,
}

impl ParticleSystem {
    /// Creates an empty pool with a seeded random stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Radial burst biased upward, with a slight per-particle color shift.
    pub fn emit_burst(&mut self, origin: Vec2, count: usize, color: Rgb) {
        for _ in 0..count {
            let velocity =
                self.radial(0.0..TAU, 50.0..200.0) + Vec2::new(0.0, -100.0);
            let lifetime = self.rng.gen_range(0.5..1.5);
            let size = self.rng.gen_range(3.0..7.0);
            let tint = Rgb::from_rgb(
                self.jitter(color.red()),
                self.jitter(color.green()),
                self.jitter(color.blue()),
            );
            self.push(Particle::new(origin, velocity, tint, lifetime, size));
        }
    }

    /// Specks drifting opposite to the mover's velocity.
    pub fn emit_trail(&mut self, origin: Vec2, velocity: Vec2, intensity: usize) {
        for _ in 0..intensity {
            let offset = Vec2::new(self.rng.gen_range(-5.0..5.0), self.rng.gen_range(-5.0..5.0));
            let spread = Vec2::new(
                self.rng.gen_range(-20.0..20.0),
                self.rng.gen_range(-20.0..20.0),
            );
            let lifetime = self.rng.gen_range(0.3..0.8);
            let size = self.rng.gen_range(2.0..4.0);
            self.push(Particle::new(
                origin + offset,
                -velocity * 0.3 + spread,
                TRAIL_COLOR,
                lifetime,
                size,
            ));
        }
    }

    /// Puff of dust under the feet; `None` spreads to both sides.
    pub fn emit_jump_dust(&mut self, origin: Vec2, direction: Option<Facing>) {
        let angles = match direction {
            None => -PI..0.0,
            Some(Facing::Left) => -PI * 0.8..-PI * 0.2,
            Some(Facing::Right) => -PI * 0.2..PI * 0.2,
        };
        for _ in 0..8 {
            let velocity = self.radial(angles.clone(), 30.0..80.0);
            let lifetime = self.rng.gen_range(0.3..0.6);
            let size = self.rng.gen_range(3.0..6.0);
            self.push(Particle::new(origin, velocity, DUST_COLOR, lifetime, size));
        }
    }

    /// Golden sparkle for a coin pickup.
    pub fn emit_coin_sparkle(&mut self, origin: Vec2) {
        for _ in 0..12 {
            let velocity = self.radial(0.0..TAU, 80.0..150.0);
            let lifetime = self.rng.gen_range(0.4..0.8);
            let size = self.rng.gen_range(2.0..5.0);
            self.push(Particle::new(origin, velocity, SPARKLE_COLOR, lifetime, size));
        }
    }

    /// Red splash when the player is hurt.
    pub fn emit_damage(&mut self, origin: Vec2) {
        for _ in 0..15 {
            let velocity = self.radial(0.0..TAU, 100.0..200.0) + Vec2::new(0.0, -50.0);
            let lifetime = self.rng.gen_range(0.3..0.7);
            let size = self.rng.gen_range(3.0..6.0);
            self.push(Particle::new(origin, velocity, DAMAGE_COLOR, lifetime, size));
        }
    }

    /// Red and orange explosion for a defeated enemy.
    pub fn emit_enemy_death(&mut self, origin: Vec2) {
        for _ in 0..20 {
            let velocity = self.radial(0.0..TAU, 80.0..250.0);
            let color = Rgb::from_rgb(
                self.rng.gen_range(200..=255),
                self.rng.gen_range(50..=150),
                self.rng.gen_range(0..=50),
            );
            let lifetime = self.rng.gen_range(0.5..1.2);
            let size = self.rng.gen_range(4.0..8.0);
            self.push(Particle::new(origin, velocity, color, lifetime, size));
        }
    }

    /// Ages every particle and drops the expired ones.
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|particle| particle.update(dt));
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles for drawing.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn push(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
        }
    }

    fn radial(&mut self, angles: std::ops::Range<f32>, speeds: std::ops::Range<f32>) -> Vec2 {
        let angle = self.rng.gen_range(angles);
        let speed = self.rng.gen_range(speeds);
        Vec2::from_angle(angle) * speed
    }

    fn jitter(&mut self, channel: u8) -> u8 {
        let shifted = i16::from(channel) + self.rng.gen_range(-20..=20);
        shifted.clamp(0, 255) as u8
    }
}
