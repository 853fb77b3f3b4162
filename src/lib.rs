// Library exports for testing
pub use config::{ARCHETYPES, ConfigError, EnemyArchetype, GameConfig};
pub use entities::{
    Bounds, Enemy, EnemyEvent, EnemyKind, EnemyManager, GameState, Particle, ParticleSystem,
    Player, PowerUp, PowerUps, Projectile,
};
pub use session::{FrameReport, GameSession, LevelUp};

pub mod app;
pub mod config;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod session;
