use glam::Vec2;
use macan_run_core::Aabb;

const FOLLOW_LERP: Vec2 = Vec2::new(0.1, 0.08);
const MAX_CAMERA_Y: f32 = 100.0;

/// Smoothed viewport origin that trails the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
}

impl Camera {
    /// Creates a camera at the origin for a viewport of the provided size.
    #[must_use]
    pub const fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Top-left corner of the visible region in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Viewport dimensions in world units.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Moves a fraction of the way toward framing the body a third from the
    /// left edge and vertically centered.
    pub fn follow(&mut self, body: &Aabb) {
        let target = Vec2::new(
            body.x - self.viewport.x / 3.0,
            body.y - self.viewport.y / 2.0,
        );
        self.position += (target - self.position) * FOLLOW_LERP;
        self.position.x = self.position.x.max(0.0);
        self.position.y = self.position.y.clamp(0.0, MAX_CAMERA_Y);
    }

    /// Snaps back to the origin.
    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
    }
}
