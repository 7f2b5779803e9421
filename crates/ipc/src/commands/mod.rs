//! Command types issued by the host.

mod layer;
mod stroke;

pub use layer::*;
pub use stroke::*;

use serde::{Deserialize, Serialize};

use crate::error::IpcError;
use crate::types::{AttributeField, AttributeValue, Rgba, ViewTransform};

/// One user action against the active drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditCommand {
    /// Make the layer of the first selected stroke active
    SelectStrokeLayer,
    /// Select every stroke on the layer of the first selected stroke
    SelectSameLayerStrokes,
    /// Deselect every stroke, including hidden and locked ones
    DeselectAllStrokes,
    ToggleLayer { flag: LayerFlag, scope: ToggleScope },
    ToggleMaterial { flag: MaterialFlag, scope: ToggleScope },
    /// New layer above the active one
    CreateLayer { name: Option<String> },
    /// New layer masked by the layers of the selection
    CreateMaskLayer { invert: bool },
    /// Mask the active layer with the layers of the selection
    AddSelectionMask { invert: bool },
    RemoveMask { name: String },
    MoveStrokesToActiveLayer,
    MoveLayer { direction: LayerMove },
    /// Regex find/replace over layer names
    RenameLayers { pattern: String, replacement: String },
    AddFilter { name: String, pattern: String },
    /// Remove the active filter
    RemoveFilter,
    SetTintColor { fill: Rgba, stroke: Rgba },
    PickBrushColor { target: ColorTarget },
    /// Rotate selected points about their centroid
    RotatePoints { angle: f32, axis: [f32; 3] },
    FatStroke(FatStrokeParams),
    FadeStrokeEdge(FadeEdgeParams),
    SelectNearestColor(NearestColorParams),
    WriteSelectedAttribute {
        field: AttributeField,
        value: AttributeValue,
    },
}

impl EditCommand {
    /// Short stable name for logging
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::SelectStrokeLayer => "select_stroke_layer",
            EditCommand::SelectSameLayerStrokes => "select_same_layer_strokes",
            EditCommand::DeselectAllStrokes => "deselect_all_strokes",
            EditCommand::ToggleLayer { .. } => "toggle_layer",
            EditCommand::ToggleMaterial { .. } => "toggle_material",
            EditCommand::CreateLayer { .. } => "create_layer",
            EditCommand::CreateMaskLayer { .. } => "create_mask_layer",
            EditCommand::AddSelectionMask { .. } => "add_selection_mask",
            EditCommand::RemoveMask { .. } => "remove_mask",
            EditCommand::MoveStrokesToActiveLayer => "move_strokes_to_active_layer",
            EditCommand::MoveLayer { .. } => "move_layer",
            EditCommand::RenameLayers { .. } => "rename_layers",
            EditCommand::AddFilter { .. } => "add_filter",
            EditCommand::RemoveFilter => "remove_filter",
            EditCommand::SetTintColor { .. } => "set_tint_color",
            EditCommand::PickBrushColor { .. } => "pick_brush_color",
            EditCommand::RotatePoints { .. } => "rotate_points",
            EditCommand::FatStroke(_) => "fat_stroke",
            EditCommand::FadeStrokeEdge(_) => "fade_stroke_edge",
            EditCommand::SelectNearestColor(_) => "select_nearest_color",
            EditCommand::WriteSelectedAttribute { .. } => "write_selected_attribute",
        }
    }
}

fn require_finite(
    command: &'static str,
    field: &'static str,
    values: &[f32],
) -> Result<(), IpcError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(IpcError::InvalidParameter {
            command,
            field,
            reason: format!("non-finite value in {values:?}"),
        })
    }
}

fn require_finite_view(command: &'static str, view: &ViewTransform) -> Result<(), IpcError> {
    require_finite(command, "view_world", view.view_world.as_flattened())?;
    require_finite(command, "view_world_inverse", view.view_world_inverse.as_flattened())
}

impl EditCommand {
    /// Reject parameters no operation can act on: NaN or infinite numbers
    /// and negative color thresholds.
    pub fn validate(&self) -> Result<(), IpcError> {
        let name = self.name();
        match self {
            EditCommand::FatStroke(params) => {
                require_finite(name, "width", &[params.width])?;
                require_finite(name, "position", &[params.position])?;
                for style in [&params.stroke, &params.fill].into_iter().flatten() {
                    if let Some(color) = &style.color {
                        require_finite(name, "color", color)?;
                    }
                }
                require_finite_view(name, &params.view)
            }
            EditCommand::FadeStrokeEdge(params) => {
                require_finite(name, "length", &[params.length])?;
                match &params.base {
                    Some(base) => require_finite(name, "base", &[base.pressure, base.strength]),
                    None => Ok(()),
                }
            }
            EditCommand::SelectNearestColor(params) => {
                require_finite(name, "threshold", &[params.threshold])?;
                if params.threshold < 0.0 {
                    return Err(IpcError::InvalidParameter {
                        command: name,
                        field: "threshold",
                        reason: format!("{} is negative", params.threshold),
                    });
                }
                Ok(())
            }
            EditCommand::SetTintColor { fill, stroke } => {
                require_finite(name, "fill", fill)?;
                require_finite(name, "stroke", stroke)
            }
            EditCommand::RotatePoints { angle, axis } => {
                require_finite(name, "angle", &[*angle])?;
                require_finite(name, "axis", axis)
            }
            EditCommand::WriteSelectedAttribute { value, .. } => match value {
                AttributeValue::Float(v) => require_finite(name, "value", &[*v]),
                AttributeValue::Color(c) => require_finite(name, "value", c),
                AttributeValue::Int(_) => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
