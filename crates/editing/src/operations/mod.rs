//! Host-facing command dispatch.
//!
//! Every [`EditCommand`] maps to one operation. Operations return the number
//! of elements they touched; `dispatch` folds that into an [`EditStatus`] and
//! swallows errors after logging them, so the host only ever sees
//! `Finished` or `NoOp`.

mod layers;
mod materials;
mod strokes;

pub use layers::*;
pub use materials::*;
pub use strokes::*;

use glam::Vec3;
use gpen_ipc::{EditCommand, EditStatus};
use tracing::{debug, warn};

use crate::error::EditError;
use crate::fade_edge::fade_stroke_edge;
use crate::fat_stroke::fat_stroke;
use crate::nearest_color::select_nearest_color;
use crate::scene::Scene;
use crate::selection::{write_selected_attribute, SelectionSnapshot};

/// Run one command against the active drawing, if there is one
pub fn dispatch(scene: Option<&mut Scene>, command: &EditCommand) -> EditStatus {
    let Some(scene) = scene else {
        debug!("{}: no active drawing", command.name());
        return EditStatus::NoOp;
    };

    match run(scene, command) {
        Ok(0) => {
            debug!("{}: nothing to do", command.name());
            EditStatus::NoOp
        }
        Ok(touched) => {
            debug!("{}: finished ({} touched)", command.name(), touched);
            EditStatus::Finished
        }
        Err(e) => {
            warn!("{}: aborted: {}", command.name(), e);
            EditStatus::NoOp
        }
    }
}

fn run(scene: &mut Scene, command: &EditCommand) -> Result<usize, EditError> {
    match command {
        EditCommand::SelectStrokeLayer => select_stroke_layer(scene),
        EditCommand::SelectSameLayerStrokes => select_same_layer_strokes(scene),
        EditCommand::DeselectAllStrokes => deselect_all_strokes(scene),
        EditCommand::ToggleLayer { flag, scope } => toggle_layer_flag(scene, *flag, *scope),
        EditCommand::ToggleMaterial { flag, scope } => toggle_material_flag(scene, *flag, *scope),
        EditCommand::CreateLayer { name } => {
            create_layer(scene, name.as_deref());
            Ok(1)
        }
        EditCommand::CreateMaskLayer { invert } => create_mask_layer(scene, *invert),
        EditCommand::AddSelectionMask { invert } => add_selection_mask(scene, *invert),
        EditCommand::RemoveMask { name } => remove_mask(scene, name),
        EditCommand::MoveStrokesToActiveLayer => move_strokes_to_active_layer(scene),
        EditCommand::MoveLayer { direction } => move_layer_order(scene, *direction),
        EditCommand::RenameLayers {
            pattern,
            replacement,
        } => rename_layers(scene, pattern, replacement),
        EditCommand::AddFilter { name, pattern } => add_filter(scene, name, pattern),
        EditCommand::RemoveFilter => remove_filter(scene),
        EditCommand::SetTintColor { fill, stroke } => set_tint_color(scene, *fill, *stroke),
        EditCommand::PickBrushColor { target } => pick_brush_color(scene, *target),
        EditCommand::RotatePoints { angle, axis } => {
            rotate_points(scene, *angle, Vec3::from_array(*axis))
        }
        EditCommand::FatStroke(params) => fat_stroke(scene, params),
        EditCommand::FadeStrokeEdge(params) => fade_stroke_edge(scene, params),
        EditCommand::SelectNearestColor(params) => select_nearest_color(scene, params),
        EditCommand::WriteSelectedAttribute { field, value } => {
            let snapshot = SelectionSnapshot::capture(scene);
            write_selected_attribute(scene, &snapshot, *field, *value)
        }
    }
}
