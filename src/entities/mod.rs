mod enemy;
mod game_state;
mod particle;
mod player;
mod power_up;
mod projectile;

// Re-export all public types
pub use enemy::{Enemy, EnemyEvent, EnemyKind, EnemyManager};
pub use game_state::{Bounds, GameState};
pub use particle::{Particle, ParticleSystem};
pub use player::Player;
pub use power_up::{PowerUp, PowerUps};
pub use projectile::Projectile;
