use glam::Vec2;
use rand::Rng;

use super::game_state::Bounds;
use super::particle::ParticleSystem;
use super::player::Player;
use crate::config::{ARCHETYPES, EnemyArchetype, GameConfig};

/// Distance floor used before normalizing the pursuit vector.
const MIN_PURSUIT_DISTANCE: f32 = 1e-4;

const DEATH_BURST: usize = 30;
const HIT_BURST: usize = 5;
const KILL_BURST: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    /// Index into [`ARCHETYPES`].
    pub fn index(self) -> usize {
        match self {
            EnemyKind::Basic => 0,
            EnemyKind::Fast => 1,
            EnemyKind::Tank => 2,
        }
    }

    pub fn archetype(self) -> &'static EnemyArchetype {
        &ARCHETYPES[self.index()]
    }

    /// Kinds unlocked at `level`: one more every two levels, never fewer than one.
    pub fn unlocked_at(level: u32) -> usize {
        (level.div_ceil(2) as usize).clamp(1, Self::ALL.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub health: u32,
    pub speed: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind, level: u32) -> Self {
        let archetype = kind.archetype();
        Self {
            pos,
            kind,
            health: archetype.health,
            speed: archetype.base_speed * level_speed_multiplier(level),
        }
    }

    pub fn archetype(&self) -> &'static EnemyArchetype {
        self.kind.archetype()
    }

    pub fn radius(&self) -> f32 {
        self.archetype().radius
    }

    pub fn take_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Steps toward `target`; returns the distance measured before the step.
    pub fn pursue(&mut self, target: Vec2) -> f32 {
        let delta = target - self.pos;
        let distance = delta.length();
        self.pos += delta / distance.max(MIN_PURSUIT_DISTANCE) * self.speed;
        distance
    }
}

pub fn level_speed_multiplier(level: u32) -> f32 {
    1.0 + level as f32 * 0.1
}

/// Outcome of one enemy update. At most one event is resolved per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyEvent {
    None,
    GameOver,
    Scored(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyManager {
    pub enemies: Vec<Enemy>,
    last_spawn_ms: u64,
    spawn_interval_ms: f32,
    spawn_margin: f32,
}

impl EnemyManager {
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        Self {
            enemies: Vec::new(),
            last_spawn_ms: now_ms,
            spawn_interval_ms: config.enemy_spawn_interval_ms,
            spawn_margin: config.spawn_margin,
        }
    }

    /// Spawn gate shrinks with the square root of the level.
    pub fn spawn_interval_ms(&self, level: u32) -> f32 {
        self.spawn_interval_ms / (level.max(1) as f32).sqrt()
    }

    /// Spawns one enemy when the gate has elapsed. Returns whether it did.
    pub fn maybe_spawn(
        &mut self,
        bounds: Bounds,
        level: u32,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> bool {
        let elapsed = now_ms.saturating_sub(self.last_spawn_ms) as f32;
        if elapsed < self.spawn_interval_ms(level) {
            return false;
        }

        let pos = self.spawn_position(bounds, rng);
        let kind = EnemyKind::ALL[rng.random_range(0..EnemyKind::unlocked_at(level))];
        log::debug!("Spawned {} at ({:.0}, {:.0})", kind.archetype().name, pos.x, pos.y);

        self.enemies.push(Enemy::new(pos, kind, level));
        self.last_spawn_ms = now_ms;
        true
    }

    /// A point just outside one of the four edges, uniform along that edge.
    fn spawn_position(&self, bounds: Bounds, rng: &mut impl Rng) -> Vec2 {
        let margin = self.spawn_margin;
        let along_x = rng.random::<f32>() * bounds.width;
        let along_y = rng.random::<f32>() * bounds.height;
        match rng.random_range(0..4) {
            0 => Vec2::new(along_x, -margin),
            1 => Vec2::new(bounds.width + margin, along_y),
            2 => Vec2::new(along_x, bounds.height + margin),
            _ => Vec2::new(-margin, along_y),
        }
    }

    /// Moves every enemy toward the player and resolves collisions.
    ///
    /// Enemies are scanned newest first, and for each enemy the projectiles
    /// newest first. The first contact or kill ends the scan.
    pub fn advance(
        &mut self,
        player: &mut Player,
        particles: &mut ParticleSystem,
        rng: &mut impl Rng,
    ) -> EnemyEvent {
        for i in (0..self.enemies.len()).rev() {
            let enemy = &mut self.enemies[i];
            let distance = enemy.pursue(player.pos);

            if distance < player.radius + enemy.radius() {
                particles.spawn_burst(player.pos, player.color, DEATH_BURST, rng);
                return EnemyEvent::GameOver;
            }

            let hit = player
                .projectiles
                .iter()
                .rposition(|p| p.pos.distance(enemy.pos) < enemy.radius() + p.radius);
            let Some(j) = hit else {
                continue;
            };

            player.projectiles.remove(j);
            enemy.take_hit();
            let color = enemy.archetype().color;
            particles.spawn_burst(enemy.pos, color, HIT_BURST, rng);

            if !enemy.is_alive() {
                let enemy = self.enemies.remove(i);
                particles.spawn_burst(enemy.pos, color, KILL_BURST, rng);
                return EnemyEvent::Scored(enemy.archetype().score_value);
            }
        }
        EnemyEvent::None
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.enemies.clear();
        self.last_spawn_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Projectile;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn setup() -> (EnemyManager, Player, ParticleSystem, StdRng) {
        let config = GameConfig::default();
        (
            EnemyManager::new(&config, 0),
            Player::new(&config, bounds()),
            ParticleSystem::new(config.max_particles, config.particle_radius),
            StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn test_enemy_health_by_type() {
        assert_eq!(Enemy::new(Vec2::ZERO, EnemyKind::Basic, 1).health, 1);
        assert_eq!(Enemy::new(Vec2::ZERO, EnemyKind::Fast, 1).health, 1);
        assert_eq!(Enemy::new(Vec2::ZERO, EnemyKind::Tank, 1).health, 3);
    }

    #[test]
    fn test_enemy_speed_scales_with_level() {
        let enemy = Enemy::new(Vec2::ZERO, EnemyKind::Basic, 1);
        assert!((enemy.speed - 2.2).abs() < 1e-5);
        let enemy = Enemy::new(Vec2::ZERO, EnemyKind::Fast, 10);
        assert!((enemy.speed - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_take_hit() {
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyKind::Tank, 1);
        enemy.take_hit();
        assert_eq!(enemy.health, 2);
        assert!(enemy.is_alive());
        enemy.take_hit();
        enemy.take_hit();
        enemy.take_hit();
        assert_eq!(enemy.health, 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_pursue_moves_toward_target() {
        let mut enemy = Enemy::new(Vec2::new(0.0, 0.0), EnemyKind::Tank, 0);
        let distance = enemy.pursue(Vec2::new(30.0, 40.0));
        assert_eq!(distance, 50.0);
        assert!((enemy.pos - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_pursue_on_top_of_target_stays_finite() {
        let mut enemy = Enemy::new(Vec2::new(5.0, 5.0), EnemyKind::Basic, 1);
        let distance = enemy.pursue(Vec2::new(5.0, 5.0));
        assert_eq!(distance, 0.0);
        assert_eq!(enemy.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_unlocked_kinds_by_level() {
        assert_eq!(EnemyKind::unlocked_at(0), 1);
        assert_eq!(EnemyKind::unlocked_at(1), 1);
        assert_eq!(EnemyKind::unlocked_at(2), 1);
        assert_eq!(EnemyKind::unlocked_at(3), 2);
        assert_eq!(EnemyKind::unlocked_at(4), 2);
        assert_eq!(EnemyKind::unlocked_at(5), 3);
        assert_eq!(EnemyKind::unlocked_at(40), 3);
    }

    #[test]
    fn test_spawn_gate() {
        let (mut manager, _, _, mut rng) = setup();
        assert!(!manager.maybe_spawn(bounds(), 1, 999, &mut rng));
        assert!(manager.maybe_spawn(bounds(), 1, 1_000, &mut rng));
        assert!(!manager.maybe_spawn(bounds(), 1, 1_500, &mut rng));
        // Level 4 halves the interval.
        assert!(manager.maybe_spawn(bounds(), 4, 1_500, &mut rng));
        assert_eq!(manager.enemies.len(), 2);
    }

    #[test]
    fn test_spawn_lands_just_outside_an_edge() {
        let (mut manager, _, _, mut rng) = setup();
        for step in 1..=200u64 {
            manager.maybe_spawn(bounds(), 1, step * 1_000, &mut rng);
        }
        assert_eq!(manager.enemies.len(), 200);
        for enemy in &manager.enemies {
            let Vec2 { x, y } = enemy.pos;
            let on_horizontal = (y == -20.0 || y == 620.0) && (0.0..=800.0).contains(&x);
            let on_vertical = (x == -20.0 || x == 820.0) && (0.0..=600.0).contains(&y);
            assert!(on_horizontal || on_vertical, "bad spawn at {x}, {y}");
        }
    }

    #[test]
    fn test_projectile_collision_threshold() {
        let (mut manager, mut player, mut particles, mut rng) = setup();
        // Far from the player so no contact.
        player.pos = Vec2::new(700.0, 500.0);
        let mut enemy = Enemy::new(Vec2::new(100.0, 100.0), EnemyKind::Basic, 1);
        enemy.speed = 0.0;
        manager.enemies.push(enemy);

        player.projectiles.push(Projectile::new(Vec2::new(126.0, 100.0), Vec2::ZERO, 5.0));
        assert_eq!(manager.advance(&mut player, &mut particles, &mut rng), EnemyEvent::None);
        assert_eq!(player.projectiles.len(), 1);

        player.projectiles.push(Projectile::new(Vec2::new(124.0, 100.0), Vec2::ZERO, 5.0));
        assert_eq!(
            manager.advance(&mut player, &mut particles, &mut rng),
            EnemyEvent::Scored(10)
        );
        assert_eq!(player.projectiles.len(), 1);
        assert!(manager.enemies.is_empty());
        // hit burst + kill burst
        assert_eq!(particles.len(), 20);
    }

    #[test]
    fn test_one_hit_per_enemy_per_frame() {
        let (mut manager, mut player, mut particles, mut rng) = setup();
        player.pos = Vec2::new(700.0, 500.0);
        let mut tank = Enemy::new(Vec2::new(100.0, 100.0), EnemyKind::Tank, 1);
        tank.speed = 0.0;
        manager.enemies.push(tank);
        for _ in 0..3 {
            player.projectiles.push(Projectile::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 5.0));
        }

        assert_eq!(manager.advance(&mut player, &mut particles, &mut rng), EnemyEvent::None);
        assert_eq!(manager.enemies[0].health, 2);
        assert_eq!(player.projectiles.len(), 2);
    }

    #[test]
    fn test_player_contact_ends_run() {
        let (mut manager, mut player, mut particles, mut rng) = setup();
        manager.enemies.push(Enemy::new(
            player.pos + Vec2::new(49.0, 0.0),
            EnemyKind::Basic,
            1,
        ));
        assert_eq!(
            manager.advance(&mut player, &mut particles, &mut rng),
            EnemyEvent::GameOver
        );
        assert_eq!(particles.len(), 30);
        assert!(particles.particles().all(|p| p.color == player.color));
    }

    #[test]
    fn test_first_event_short_circuits() {
        let (mut manager, mut player, mut particles, mut rng) = setup();
        player.pos = Vec2::new(700.0, 500.0);
        for x in [100.0, 300.0] {
            let mut enemy = Enemy::new(Vec2::new(x, 100.0), EnemyKind::Basic, 1);
            enemy.speed = 0.0;
            manager.enemies.push(enemy);
            player.projectiles.push(Projectile::new(Vec2::new(x, 100.0), Vec2::ZERO, 5.0));
        }

        // Newest enemy (x = 300) resolves first.
        assert_eq!(
            manager.advance(&mut player, &mut particles, &mut rng),
            EnemyEvent::Scored(10)
        );
        assert_eq!(manager.enemies.len(), 1);
        assert_eq!(manager.enemies[0].pos.x, 100.0);
        assert_eq!(
            manager.advance(&mut player, &mut particles, &mut rng),
            EnemyEvent::Scored(10)
        );
        assert!(manager.enemies.is_empty());
    }

    #[test]
    fn test_reset_clears_enemies() {
        let (mut manager, _, _, mut rng) = setup();
        manager.maybe_spawn(bounds(), 1, 2_000, &mut rng);
        manager.reset(5_000);
        assert_eq!(manager, EnemyManager::new(&GameConfig::default(), 5_000));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawned_kind_is_unlocked(level in 1u32..12, seed in any::<u64>()) {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut manager = EnemyManager::new(&GameConfig::default(), 0);
                for step in 1..=30u64 {
                    manager.maybe_spawn(bounds(), level, step * 1_000, &mut rng);
                }
                for enemy in &manager.enemies {
                    prop_assert!(enemy.kind.index() < EnemyKind::unlocked_at(level));
                }
            }

            #[test]
            fn test_enemy_health_never_underflows(
                kind in prop::sample::select(EnemyKind::ALL.to_vec()),
                hits in 0usize..10
            ) {
                let mut enemy = Enemy::new(Vec2::ZERO, kind, 1);
                let initial = enemy.health;
                for _ in 0..hits {
                    enemy.take_hit();
                }
                prop_assert!(enemy.health <= initial);
                prop_assert_eq!(enemy.is_alive(), hits < initial as usize);
            }
        }
    }

    #[test]
    fn test_all_kinds_reachable_at_level_five() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut manager = EnemyManager::new(&GameConfig::default(), 0);
        for step in 1..=300u64 {
            manager.maybe_spawn(bounds(), 5, step * 1_000, &mut rng);
        }
        for kind in EnemyKind::ALL {
            assert!(manager.enemies.iter().any(|e| e.kind == kind));
        }
    }
}
