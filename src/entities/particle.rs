use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1.0 when spawned, retired at or below zero.
    pub life: f32,
    pub decay: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 0.0,
            color: Color::Reset,
            life: 0.0,
            decay: 0.0,
        }
    }
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= self.decay;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Fixed-capacity particle pool.
///
/// Storage is allocated once. Each slot index is either in `live` or in
/// `free`, never both, so the live count can never exceed the capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    slots: Vec<Particle>,
    live: Vec<usize>,
    free: Vec<usize>,
    radius: f32,
}

impl ParticleSystem {
    pub fn new(capacity: usize, radius: f32) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            live: Vec::with_capacity(capacity),
            // Reversed so slots are handed out in ascending order.
            free: (0..capacity).rev().collect(),
            radius,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.live.iter().map(|&slot| &self.slots[slot])
    }

    /// Spawns up to `count` particles evenly spread around `origin`.
    /// Silently spawns fewer when the pool is short. Returns how many spawned.
    pub fn spawn_burst(
        &mut self,
        origin: Vec2,
        color: Color,
        count: usize,
        rng: &mut impl Rng,
    ) -> usize {
        let actual = count.min(self.free.len());
        for i in 0..actual {
            let Some(slot) = self.free.pop() else {
                break;
            };
            let angle = TAU * i as f32 / actual as f32;
            let speed: f32 = rng.random_range(2.0..4.0);
            self.slots[slot] = Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                radius: self.radius,
                color,
                life: 1.0,
                decay: rng.random_range(0.02..0.04),
            };
            self.live.push(slot);
        }
        if actual < count {
            log::trace!("Particle pool short: spawned {actual} of {count}");
        }
        actual
    }

    /// Ages every live particle and hands expired slots back to the pool.
    pub fn advance(&mut self) {
        for &slot in &self.live {
            self.slots[slot].update();
        }

        let slots = &self.slots;
        let free = &mut self.free;
        self.live.retain(|&slot| {
            if slots[slot].is_dead() {
                free.push(slot);
                false
            } else {
                true
            }
        });
    }

    /// Empties the live set and restores the pristine pool.
    pub fn reset(&mut self) {
        *self = Self::new(self.capacity(), self.radius);
    }
}
