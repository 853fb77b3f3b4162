//! One play attempt: the per-frame simulation step and the level/power-up
//! progression that sits on top of it.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Bounds, EnemyEvent, EnemyManager, GameState, ParticleSystem, Player, PowerUp, PowerUps,
};

/// A level gained during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    /// `None` once every power-up is already held.
    pub power_up: Option<PowerUp>,
}

/// What changed during one [`GameSession::update`], for the host's HUD and log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub scored: Option<u32>,
    pub level_up: Option<LevelUp>,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub state: GameState,
    pub player: Player,
    pub enemies: EnemyManager,
    pub particles: ParticleSystem,
    pub score: u32,
    pub power_ups: PowerUps,
    bounds: Bounds,
    config: GameConfig,
}

impl GameSession {
    pub fn new(config: &GameConfig, bounds: Bounds, now_ms: u64) -> Self {
        Self {
            state: GameState::Running,
            player: Player::new(config, bounds),
            enemies: EnemyManager::new(config, now_ms),
            particles: ParticleSystem::new(config.max_particles, config.particle_radius),
            score: 0,
            power_ups: PowerUps::default(),
            bounds,
            config: config.clone(),
        }
    }

    pub fn level(&self) -> u32 {
        self.player.level
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Host viewport changed. Takes effect on the next update.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Advances the simulation by one frame. Does nothing once the run is over.
    pub fn update(&mut self, now_ms: u64, rng: &mut impl Rng) -> FrameReport {
        let mut report = FrameReport::default();
        if self.state != GameState::Running {
            return report;
        }

        self.player.move_within(self.bounds);
        self.player.fire(&self.power_ups, now_ms);
        self.player.advance_projectiles(self.bounds);

        self.enemies
            .maybe_spawn(self.bounds, self.player.level, now_ms, rng);
        match self
            .enemies
            .advance(&mut self.player, &mut self.particles, rng)
        {
            EnemyEvent::GameOver => {
                self.state = GameState::GameOver;
                report.game_over = true;
                log::info!(
                    "Game over: score {} at level {}",
                    self.score,
                    self.player.level
                );
                return report;
            }
            EnemyEvent::Scored(points) => {
                report.scored = Some(points);
                report.level_up = self.award(points, rng);
            }
            EnemyEvent::None => {}
        }

        self.particles.advance();
        report
    }

    /// Adds a kill's points to score and xp, levelling up when the threshold is met.
    pub fn award(&mut self, points: u32, rng: &mut impl Rng) -> Option<LevelUp> {
        self.score += points;
        self.player.xp += points as f32;
        if self.player.xp < self.player.xp_to_next_level {
            return None;
        }

        self.player.level += 1;
        self.player.xp = 0.0;
        self.player.xp_to_next_level *= self.config.level_up_factor;
        let power_up = self.power_ups.grant_random(rng);

        match power_up {
            Some(p) => log::info!("Level {} reached, unlocked {}", self.player.level, p.get_name()),
            None => log::info!("Level {} reached", self.player.level),
        }

        Some(LevelUp {
            level: self.player.level,
            power_up,
        })
    }

    /// Starts a fresh run. Only valid after a game over; returns whether it restarted.
    pub fn restart(&mut self, now_ms: u64) -> bool {
        if self.state != GameState::GameOver {
            return false;
        }
        self.reset(now_ms);
        log::info!("Session restarted");
        true
    }

    /// Returns every subsystem and the progression state to their initial values.
    pub fn reset(&mut self, now_ms: u64) {
        self.state = GameState::Running;
        self.player.reset(self.bounds);
        self.enemies.reset(now_ms);
        self.particles.reset();
        self.score = 0;
        self.power_ups = PowerUps::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Enemy, EnemyKind, Projectile};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn session() -> GameSession {
        GameSession::new(&GameConfig::default(), bounds(), 0)
    }

    #[test]
    fn test_new_session() {
        let session = session();
        assert_eq!(session.state, GameState::Running);
        assert_eq!(session.score, 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.power_ups, PowerUps::default());
    }

    #[test]
    fn test_first_update_fires_volley() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(1);
        let report = session.update(0, &mut rng);
        assert_eq!(report, FrameReport::default());
        assert_eq!(session.player.projectiles.len(), 8);
    }

    #[test]
    fn test_award_below_threshold() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(session.award(25, &mut rng), None);
        assert_eq!(session.score, 25);
        assert_eq!(session.player.xp, 25.0);
    }

    #[test]
    fn test_level_up_law() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(1);
        session.award(90, &mut rng);
        let level_up = session.award(15, &mut rng).expect("level up");

        assert_eq!(level_up.level, 2);
        assert_eq!(session.level(), 2);
        assert_eq!(session.player.xp, 0.0);
        assert_eq!(session.player.xp_to_next_level, 150.0);
        assert_eq!(session.score, 105);
        let granted = level_up.power_up.expect("power-up");
        assert!(session.power_ups.has(granted));
        assert_eq!(session.power_ups.active().count(), 1);

        let level_up = session.award(150, &mut rng).expect("level up");
        assert_eq!(level_up.level, 3);
        assert_eq!(session.player.xp_to_next_level, 225.0);
        assert_ne!(level_up.power_up, Some(granted));
        assert!(session.power_ups.has(granted));
        assert_eq!(session.power_ups.active().count(), 2);
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(1);
        let pos = session.player.pos;
        session
            .enemies
            .enemies
            .push(Enemy::new(pos, EnemyKind::Basic, 1));

        let report = session.update(0, &mut rng);
        assert!(report.game_over);
        assert!(session.is_game_over());

        let snapshot = session.clone();
        assert_eq!(session.update(5_000, &mut rng), FrameReport::default());
        assert_eq!(session, snapshot);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut session = session();
        assert!(!session.restart(100));
        session.state = GameState::GameOver;
        assert!(session.restart(100));
        assert_eq!(session.state, GameState::Running);
    }

    #[test]
    fn test_reset_matches_fresh_session() {
        let mut session = session();
        let mut rng = StdRng::seed_from_u64(9);
        for frame in 0..300u64 {
            session.update(frame * 16, &mut rng);
        }
        session.award(500, &mut rng);
        session.player.projectiles.push(Projectile::new(Vec2::ZERO, Vec2::ONE, 5.0));
        session.particles.spawn_burst(Vec2::ZERO, ratatui::style::Color::Red, 10, &mut rng);
        session.state = GameState::GameOver;

        assert!(session.restart(7_000));
        assert_eq!(
            session,
            GameSession::new(&GameConfig::default(), bounds(), 7_000)
        );
    }
}
