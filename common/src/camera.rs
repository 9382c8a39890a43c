//! Orbital 3D camera and screen projection

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// 3D perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    // Orbital parameters
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

/// A point mapped onto the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Pixel coordinates, origin at the top-left of the viewport
    pub screen: Vec2,
    /// Distance from the eye along the view direction
    pub depth: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 5000.0,
            distance: 60.0,
            yaw: 0.0,
            pitch: 0.6,
        };
        camera.update_orbital();
        camera
    }

    /// Update camera position based on orbital parameters
    pub fn update_orbital(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.distance * self.pitch.cos() * self.yaw.sin(),
                self.distance * self.pitch.sin(),
                self.distance * self.pitch.cos() * self.yaw.cos(),
            );
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
        self.update_orbital();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).max(1.0);
        self.update_orbital();
    }

    /// Keep the same orbit but centre it on `target`
    pub fn follow(&mut self, target: Vec3) {
        self.target = target;
        self.update_orbital();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Map a world point into a viewport of `size` pixels; `None` if behind the eye
    pub fn project(&self, point: Vec3, size: Vec2) -> Option<Projected> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Projected {
            screen: Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y),
            depth: clip.w,
        })
    }

    /// Screen size in pixels of a world length seen at `depth`
    pub fn pixels_at_depth(&self, length: f32, depth: f32, viewport_height: f32) -> f32 {
        let half_height = depth * (self.fov * 0.5).tan();
        length / half_height * viewport_height * 0.5
    }
}
