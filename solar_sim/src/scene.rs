//! Scene drawing for the viewer
//!
//! Bodies, trails, force and velocity arrows and a star field, projected through
//! the orbital camera and painted with egui.

use std::collections::VecDeque;

use common::Camera3D;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use glam::Vec3;
use rand::Rng;
use solar_sim::{Body, SimEvent};

/// Trail points kept per body
const TRAIL_LENGTH: usize = 100;
const STAR_COUNT: usize = 400;

/// What the user chose to see
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub trails: bool,
    pub forces: bool,
    pub velocities: bool,
    /// Brightness of lit (non-emissive) bodies, 0..=1
    pub ambient: f32,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            trails: true,
            forces: true,
            velocities: true,
            ambient: 0.5,
        }
    }
}

pub struct SceneView {
    trails: Vec<VecDeque<Vec3>>,
    stars: Vec<(Vec3, f32)>,
    focus: usize,
}

impl SceneView {
    pub fn new(body_count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let stars = (0..STAR_COUNT)
            .map(|_| {
                // Uniform direction on the unit sphere
                let z: f32 = rng.gen_range(-1.0..1.0);
                let angle: f32 = rng.gen::<f32>() * std::f32::consts::TAU;
                let r = (1.0 - z * z).sqrt();
                let dir = Vec3::new(r * angle.cos(), z, r * angle.sin());
                (dir, rng.gen_range(0.3..1.0))
            })
            .collect();

        Self {
            trails: vec![VecDeque::new(); body_count],
            stars,
            focus: 0,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Follow the next body, wrapping back to the sun
    pub fn cycle_focus(&mut self, body_count: usize) {
        self.focus = if self.focus + 1 < body_count {
            self.focus + 1
        } else {
            0
        };
    }

    pub fn clear_trails(&mut self) {
        for trail in &mut self.trails {
            trail.clear();
        }
    }

    pub fn apply_events(&mut self, events: &[SimEvent], body_count: usize) {
        for event in events {
            match event {
                SimEvent::Reset => self.clear_trails(),
                SimEvent::BodyAdded(_) | SimEvent::BodyRemoved(_) => {
                    self.trails.resize_with(body_count, VecDeque::new);
                }
                _ => {}
            }
        }
        if self.focus >= body_count {
            self.focus = 0;
        }
    }

    /// Extend every trail with the current positions
    pub fn record(&mut self, bodies: &[Body]) {
        self.trails.resize_with(bodies.len(), VecDeque::new);
        for (trail, body) in self.trails.iter_mut().zip(bodies) {
            trail.push_back(body.position.as_vec3());
            if trail.len() > TRAIL_LENGTH {
                trail.pop_front();
            }
        }
    }

    pub fn draw(
        &self,
        painter: &Painter,
        rect: Rect,
        camera: &Camera3D,
        bodies: &[Body],
        options: &DrawOptions,
    ) {
        let size = glam::Vec2::new(rect.width(), rect.height());
        let to_screen = |point: Vec3| {
            camera
                .project(point, size)
                .map(|p| (rect.min + Vec2::new(p.screen.x, p.screen.y), p.depth))
        };

        let sky_radius = camera.far * 0.5;
        for (dir, brightness) in &self.stars {
            if let Some((pos, _)) = to_screen(camera.position + *dir * sky_radius) {
                let shade = (brightness * 255.0) as u8;
                painter.circle_filled(pos, 1.0, Color32::from_gray(shade));
            }
        }

        if options.trails {
            for trail in &self.trails {
                let points: Vec<Pos2> = trail.iter().filter_map(|p| to_screen(*p)).map(|(pos, _)| pos).collect();
                if points.len() > 1 {
                    painter.add(Shape::line(points, Stroke::new(1.0, Color32::from_gray(140))));
                }
            }
        }

        // Far bodies first so near ones are painted over them
        let mut visible: Vec<(&Body, Pos2, f32)> = bodies
            .iter()
            .filter_map(|body| to_screen(body.position.as_vec3()).map(|(pos, depth)| (body, pos, depth)))
            .collect();
        visible.sort_by(|a, b| b.2.total_cmp(&a.2));

        for (body, pos, depth) in visible {
            let radius = camera
                .pixels_at_depth(body.radius as f32, depth, rect.height())
                .max(2.0);
            painter.circle_filled(pos, radius, body_color(body, options.ambient));

            if options.forces {
                let force = body.force.as_vec3();
                if force.length() > 0.0 {
                    let length = 100.0 * force.length() + body.radius as f32;
                    self.draw_arrow(painter, &to_screen, body, force.normalize() * length, Color32::RED);
                }
            }
            if options.velocities {
                let momentum = body.momentum.as_vec3();
                if momentum.length() > 0.0 {
                    let speed = momentum.length() / body.mass as f32;
                    let length = (speed.log10() + body.radius as f32).max(0.0);
                    self.draw_arrow(painter, &to_screen, body, momentum.normalize() * length, Color32::GREEN);
                }
            }

            if !body.is_sun() {
                painter.text(
                    pos + Vec2::new(radius + 2.0, -radius - 2.0),
                    Align2::LEFT_BOTTOM,
                    body.label(),
                    FontId::proportional(12.0),
                    Color32::LIGHT_GRAY,
                );
            }
        }
    }

    fn draw_arrow(
        &self,
        painter: &Painter,
        to_screen: &impl Fn(Vec3) -> Option<(Pos2, f32)>,
        body: &Body,
        axis: Vec3,
        color: Color32,
    ) {
        let origin = body.position.as_vec3();
        if let (Some((from, _)), Some((to, _))) = (to_screen(origin), to_screen(origin + axis)) {
            painter.arrow(from, to - from, Stroke::new(2.0, color));
        }
    }
}

fn body_color(body: &Body, ambient: f32) -> Color32 {
    if body.emissive() {
        return Color32::from_rgb(255, 220, 60);
    }
    let light = 0.25 + 0.75 * ambient.clamp(0.0, 1.0);
    let shade = |c: f32| (c * light * 255.0) as u8;
    Color32::from_rgb(shade(0.55), shade(0.75), shade(1.0))
}
