//! Renderable frames: what the driver hands to a render adapter each tick.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Named RGBA colors shared by the scenes.
pub mod palette {
    use glam::Vec4;

    pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
    pub const GOLD: Vec4 = Vec4::new(1.0, 0.84, 0.0, 1.0);
    pub const CYAN: Vec4 = Vec4::new(0.0, 1.0, 1.0, 1.0);
    pub const MAGENTA: Vec4 = Vec4::new(1.0, 0.0, 1.0, 1.0);
    pub const VIOLET: Vec4 = Vec4::new(0.67, 0.0, 1.0, 1.0);
    pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    pub const OBSIDIAN: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

    /// Same color with a new alpha.
    pub fn fade(color: Vec4, alpha: f32) -> Vec4 {
        Vec4::new(color.x, color.y, color.z, alpha.clamp(0.0, 1.0))
    }
}

/// One styled particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub position: Vec3,
    pub color: Vec4,
    pub size: f32,
}

/// Non-particle geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Polyline {
        points: Vec<Vec3>,
        color: Vec4,
        width: f32,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        color: Vec4,
    },
    /// Horizontal circle.
    Ring {
        center: Vec3,
        radius: f32,
        color: Vec4,
    },
    Marker {
        position: Vec3,
        color: Vec4,
        size: f32,
    },
}

impl Shape {
    pub fn segment(from: Vec3, to: Vec3, color: Vec4, width: f32) -> Self {
        Shape::Polyline {
            points: vec![from, to],
            color,
            width,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Polyline { points, .. } => points.iter().all(|p| p.is_finite()),
            Shape::Sphere { center, radius, .. } | Shape::Ring { center, radius, .. } => {
                center.is_finite() && radius.is_finite()
            }
            Shape::Marker { position, .. } => position.is_finite(),
        }
    }
}

/// Camera angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub elevation: f32,
    pub azimuth: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            elevation: 30.0,
            azimuth: -60.0,
        }
    }
}

impl Camera {
    pub fn fixed(elevation: f32, azimuth: f32) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// Constant elevation, azimuth turning `rate` degrees per tick.
    pub fn orbit(tick: u64, elevation: f32, rate: f32) -> Self {
        Self {
            elevation,
            azimuth: tick as f32 * rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableFrame {
    pub tick: u64,
    pub sprites: Vec<Sprite>,
    pub shapes: Vec<Shape>,
    pub camera: Camera,
    pub caption: Option<String>,
}

impl RenderableFrame {
    pub fn is_finite(&self) -> bool {
        self.sprites.iter().all(|s| s.position.is_finite()) && self.shapes.iter().all(Shape::is_finite)
    }
}
