use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver,
}

/// Playfield size in world units. Resized by the host between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when `pos` lies within the playfield grown by `margin` on every side.
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        assert_eq!(Bounds::new(800.0, 600.0).center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_contains_with_margin_edges() {
        let bounds = Bounds::new(100.0, 100.0);
        assert!(bounds.contains_with_margin(Vec2::new(-50.0, 150.0), 50.0));
        assert!(!bounds.contains_with_margin(Vec2::new(-50.1, 50.0), 50.0));
        assert!(!bounds.contains_with_margin(Vec2::new(50.0, 150.1), 50.0));
    }
}
