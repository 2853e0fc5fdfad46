use nalgebra_glm as glm;

/// Screen rectangle used to normalize pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// True when the rectangle has no area to normalize against.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Map a pixel position to `[-1, 1]²` with Y pointing up.
    pub fn normalize(&self, pos: &glm::Vec2) -> glm::Vec2 {
        glm::vec2(
            pos.x / (self.width / 2.0) - 1.0,
            1.0 - pos.y / (self.height / 2.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}
