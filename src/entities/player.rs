use std::f32::consts::TAU;
use std::f64::consts::PI;

use glam::Vec2;
use ratatui::style::Color;

use super::game_state::Bounds;
use super::power_up::PowerUps;
use super::projectile::Projectile;
use crate::config::{GameConfig, PLAYER_COLOR};

const BASE_SHOT_COUNT: usize = 8;
const MULTI_SHOT_COUNT: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub color: Color,
    pub projectiles: Vec<Projectile>,
    pub last_shot_ms: Option<u64>,
    pub shoot_interval_ms: u64,
    pub level: u32,
    pub xp: f32,
    pub xp_to_next_level: f32,
    /// Last firewall pulse index (`now_ms / period`) that emitted a shot.
    last_firewall_pulse: Option<u64>,
    config: GameConfig,
}

impl Player {
    pub fn new(config: &GameConfig, bounds: Bounds) -> Self {
        Self {
            pos: bounds.center(),
            vel: Vec2::ZERO,
            radius: config.player_radius,
            speed: config.player_speed,
            color: PLAYER_COLOR,
            projectiles: Vec::new(),
            last_shot_ms: None,
            shoot_interval_ms: config.shoot_interval_ms,
            level: config.initial_level,
            xp: config.initial_xp,
            xp_to_next_level: config.initial_xp_to_level,
            last_firewall_pulse: None,
            config: config.clone(),
        }
    }

    /// Sets the velocity from an input intention, capped at the player's speed.
    pub fn steer(&mut self, intent: Vec2) {
        self.vel = if intent.is_finite() {
            intent.clamp_length_max(self.speed)
        } else {
            Vec2::ZERO
        };
    }

    /// Integrates velocity and keeps the whole circle inside the playfield.
    pub fn move_within(&mut self, bounds: Bounds) {
        let next = self.pos + self.vel;
        self.pos.x = next.x.min(bounds.width - self.radius).max(self.radius);
        self.pos.y = next.y.min(bounds.height - self.radius).max(self.radius);
    }

    pub fn effective_shoot_interval_ms(&self, power_ups: &PowerUps) -> u64 {
        if power_ups.rapid_fire {
            self.shoot_interval_ms / 2
        } else {
            self.shoot_interval_ms
        }
    }

    /// Fires a radial volley when the cooldown allows, plus a firewall orb
    /// once per firewall period while that power-up is held.
    /// Returns how many projectiles were spawned.
    pub fn fire(&mut self, power_ups: &PowerUps, now_ms: u64) -> usize {
        let before = self.projectiles.len();
        let interval = self.effective_shoot_interval_ms(power_ups);
        let ready = self
            .last_shot_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= interval);

        if ready {
            let count = if power_ups.multi_shot {
                MULTI_SHOT_COUNT
            } else {
                BASE_SHOT_COUNT
            };
            for i in 0..count {
                let angle = TAU * i as f32 / count as f32;
                self.projectiles.push(Projectile::radial(
                    self.pos,
                    angle,
                    self.config.projectile_speed,
                    self.config.projectile_radius,
                ));
            }
            self.last_shot_ms = Some(now_ms);
        }

        if power_ups.firewall {
            let pulse = now_ms / self.config.firewall_period_ms.max(1);
            if self.last_firewall_pulse != Some(pulse) {
                self.last_firewall_pulse = Some(pulse);
                // Sweeps half a turn per second of wall-clock time.
                let angle = ((now_ms as f64 / 1000.0) * PI) as f32;
                let dir = Vec2::from_angle(angle);
                self.projectiles.push(Projectile::new(
                    self.pos + dir * self.config.firewall_offset,
                    dir * self.config.firewall_speed,
                    self.config.firewall_radius,
                ));
            }
        }

        self.projectiles.len() - before
    }

    pub fn advance_projectiles(&mut self, bounds: Bounds) {
        let margin = self.config.projectile_cull_margin;
        for projectile in &mut self.projectiles {
            projectile.update();
        }
        self.projectiles
            .retain(|p| bounds.contains_with_margin(p.pos, margin));
    }

    /// Back to the spawn state. Radius, speed, color and fire interval are static tuning.
    pub fn reset(&mut self, bounds: Bounds) {
        self.pos = bounds.center();
        self.vel = Vec2::ZERO;
        self.projectiles.clear();
        self.last_shot_ms = None;
        self.last_firewall_pulse = None;
        self.level = self.config.initial_level;
        self.xp = self.config.initial_xp;
        self.xp_to_next_level = self.config.initial_xp_to_level;
    }
}
