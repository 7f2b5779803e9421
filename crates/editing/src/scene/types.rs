//! Scene data model: layers, frames, strokes, points and materials.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub use gpen_ipc::Rgba;

/// End cap style of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapMode {
    #[default]
    Round,
    Flat,
}

/// Fill texture placement of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvTransform {
    pub translation: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// A single stroke point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Vec3,
    pub select: bool,
    /// Scales the stroke half-width (>= 0)
    pub pressure: f32,
    /// Scales opacity (0..1)
    pub strength: f32,
    /// Linear RGBA
    pub vertex_color: Rgba,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            select: false,
            pressure: 1.0,
            strength: 1.0,
            vertex_color: [0.0; 4],
        }
    }
}

impl Point {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// An ordered polyline of points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub select: bool,
    /// Selection order; 0 when unselected
    pub select_index: u32,
    pub material_index: usize,
    /// Linear RGBA
    pub vertex_color_fill: Rgba,
    pub line_width: i32,
    pub hardness: f32,
    pub start_cap: CapMode,
    pub end_cap: CapMode,
    pub uv: UvTransform,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            select: false,
            select_index: 0,
            material_index: 0,
            vertex_color_fill: [0.0; 4],
            line_width: 10,
            hardness: 1.0,
            start_cap: CapMode::Round,
            end_cap: CapMode::Round,
            uv: UvTransform::default(),
        }
    }
}

impl Stroke {
    /// A stroke with one default point per position
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            points: positions.into_iter().map(Point::new).collect(),
            ..Default::default()
        }
    }

    /// Copy of every stroke-level attribute with no points and no selection
    pub fn empty_like(&self) -> Self {
        Self {
            points: Vec::new(),
            select: false,
            select_index: 0,
            material_index: self.material_index,
            vertex_color_fill: self.vertex_color_fill,
            line_width: self.line_width,
            hardness: self.hardness,
            start_cap: self.start_cap,
            end_cap: self.end_cap,
            uv: self.uv,
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(|p| p.position)
    }
}

/// A snapshot of strokes at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub frame_number: i32,
    pub strokes: Vec<Stroke>,
}

impl Frame {
    pub fn new(frame_number: i32) -> Self {
        Self {
            frame_number,
            strokes: Vec::new(),
        }
    }
}

/// A mask reference to another layer, by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskEntry {
    pub layer: String,
    pub invert: bool,
}

/// A named container of frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, used as a lookup key (first match wins)
    pub info: String,
    pub hide: bool,
    pub lock: bool,
    pub frames: Vec<Frame>,
    pub active_frame: Option<usize>,
    pub mask_layers: Vec<MaskEntry>,
    pub use_mask_layer: bool,
    pub pass_index: u32,
}

impl Layer {
    /// A layer with one empty frame (number 0) made active
    pub fn new(info: impl Into<String>) -> Self {
        Self {
            info: info.into(),
            hide: false,
            lock: false,
            frames: vec![Frame::new(0)],
            active_frame: Some(0),
            mask_layers: Vec::new(),
            use_mask_layer: false,
            pass_index: 0,
        }
    }

    pub fn active_frame(&self) -> Option<&Frame> {
        self.active_frame.and_then(|i| self.frames.get(i))
    }

    pub fn active_frame_mut(&mut self) -> Option<&mut Frame> {
        self.active_frame.and_then(|i| self.frames.get_mut(i))
    }

    /// Index of the active frame if it exists
    pub fn active_frame_index(&self) -> Option<usize> {
        self.active_frame.filter(|&i| i < self.frames.len())
    }
}

/// Material display record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub hide: bool,
    pub lock: bool,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hide: false,
            lock: false,
        }
    }
}

/// Drawing tool colors (sRGB, as shown in a color picker)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Rgba,
    pub fill_color: Rgba,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            fill_color: [0.5, 0.5, 0.5, 1.0],
        }
    }
}

/// Address of a stroke inside a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrokeKey {
    pub layer: usize,
    pub frame: usize,
    pub stroke: usize,
}

/// Address of a point inside a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointKey {
    pub stroke: StrokeKey,
    pub point: usize,
}
