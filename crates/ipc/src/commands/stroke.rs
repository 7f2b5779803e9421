//! Stroke geometry and color selection command types.

use gpen_config::{DEFAULT_BASE_PRESSURE, DEFAULT_BASE_STRENGTH, EditorConfig};
use serde::{Deserialize, Serialize};

use crate::types::{Rgba, ViewTransform};

/// How the two offset branches of a fat stroke are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OffsetMode {
    /// One stroke holding both branches in source order
    #[default]
    Merge,
    /// One closed outline: the second branch is appended reversed
    Outline,
    /// One stroke per branch
    Split,
}

/// Material and color of an emitted branch.
///
/// `None` copies the value from the source stroke.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BranchStyle {
    pub material_index: Option<usize>,
    pub color: Option<Rgba>,
}

/// Parameters for the fat stroke (offset duplication) operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatStrokeParams {
    /// Lateral half-width, scaled by the falloff curve
    pub width: f32,
    /// Lateral position shift, scaled by the falloff curve
    pub position: f32,
    pub mode: OffsetMode,
    /// Emit line strokes carrying the source point attributes
    pub stroke: Option<BranchStyle>,
    /// Emit fill strokes carrying positions only
    pub fill: Option<BranchStyle>,
    /// Keep the source stroke after emission
    pub keep_source: bool,
    pub view: ViewTransform,
}

impl Default for FatStrokeParams {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl FatStrokeParams {
    /// Line strokes only, width and position taken from `config`
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            width: config.fat_stroke_width(),
            position: config.fat_stroke_position,
            mode: OffsetMode::Merge,
            stroke: Some(BranchStyle::default()),
            fill: None,
            keep_source: false,
            view: ViewTransform::identity(),
        }
    }
}

/// Which ends of a stroke are tapered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaperEnds {
    Start,
    End,
    #[default]
    Both,
}

impl TaperEnds {
    pub fn start(self) -> bool {
        matches!(self, TaperEnds::Start | TaperEnds::Both)
    }

    pub fn end(self) -> bool {
        matches!(self, TaperEnds::End | TaperEnds::Both)
    }
}

/// Base values written to every point before tapering.
///
/// A single switch covers both fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseThickness {
    pub pressure: f32,
    pub strength: f32,
}

impl Default for BaseThickness {
    fn default() -> Self {
        Self {
            pressure: DEFAULT_BASE_PRESSURE,
            strength: DEFAULT_BASE_STRENGTH,
        }
    }
}

/// Parameters for the fade stroke edge (taper) operation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeEdgeParams {
    /// Arc length budget measured from each tapered end
    pub length: f32,
    pub ends: TaperEnds,
    /// Scale point pressure
    pub pressure: bool,
    /// Scale point strength
    pub strength: bool,
    pub base: Option<BaseThickness>,
}

impl Default for FadeEdgeParams {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl FadeEdgeParams {
    /// Pressure taper on both ends over the configured length
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            length: config.fade_length(),
            ends: TaperEnds::Both,
            pressure: true,
            strength: false,
            base: None,
        }
    }
}

/// Color domain compared by nearest-color selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorTarget {
    /// Per-stroke fill color
    Fill,
    /// Per-point stroke color
    #[default]
    Stroke,
}

/// Selection change applied to matching candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectAction {
    #[default]
    Select,
    Deselect,
}

impl SelectAction {
    pub fn selects(self) -> bool {
        matches!(self, SelectAction::Select)
    }
}

/// Parameters for nearest-color selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestColorParams {
    pub target: ColorTarget,
    /// Maximum half RGBA distance to a reference color
    pub threshold: f32,
    pub action: SelectAction,
}

impl Default for NearestColorParams {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl NearestColorParams {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            target: ColorTarget::Stroke,
            threshold: config.color_threshold(),
            action: SelectAction::Select,
        }
    }
}
