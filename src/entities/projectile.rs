use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Fixed at spawn.
    vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// Projectile leaving `origin` along `angle` (radians) at `speed`.
    pub fn radial(origin: Vec2, angle: f32, speed: f32, radius: f32) -> Self {
        Self::new(origin, Vec2::from_angle(angle) * speed, radius)
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }
}
