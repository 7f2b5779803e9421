//! Color-proximity selection.
//!
//! Reference colors come from the current selection (fill colors of
//! selected strokes, or colors of selected points), de-duplicated. Every
//! queryable candidate whose RGBA distance to any reference, halved, is
//! within the threshold gets selected or deselected.

use gpen_ipc::{ColorTarget, NearestColorParams};
use tracing::{debug, info};

use crate::error::EditError;
use crate::geometry::color_distance;
use crate::scene::{PointKey, Rgba, Scene, StrokeKey};

/// De-duplicated reference colors of the current selection
pub fn reference_colors(scene: &Scene, target: ColorTarget) -> Vec<Rgba> {
    let colors: Vec<Rgba> = match target {
        ColorTarget::Fill => scene
            .query()
            .selected_strokes()
            .map(|item| item.stroke.vertex_color_fill)
            .collect(),
        ColorTarget::Stroke => scene
            .query()
            .selected_points()
            .map(|item| item.point.vertex_color)
            .collect(),
    };
    let mut unique: Vec<Rgba> = Vec::with_capacity(colors.len());
    for color in colors {
        if !unique.contains(&color) {
            unique.push(color);
        }
    }
    unique
}

/// True when `color` lies within `threshold` of any reference
pub fn is_near(color: Rgba, references: &[Rgba], threshold: f32) -> bool {
    references
        .iter()
        .any(|r| color_distance(color, *r) / 2.0 <= threshold)
}

/// Select or deselect every candidate near a selected color.
///
/// For point colors, a stroke's own `select` flag follows its points
/// afterwards (selected while any point is). Returns the number of
/// candidates whose flag changed.
pub fn select_nearest_color(
    scene: &mut Scene,
    params: &NearestColorParams,
) -> Result<usize, EditError> {
    let references = reference_colors(scene, params.target);
    if references.is_empty() {
        debug!("select_nearest_color: nothing selected to compare against");
        return Ok(0);
    }
    let select = params.action.selects();

    let changed = match params.target {
        ColorTarget::Fill => {
            let keys: Vec<StrokeKey> = scene
                .query()
                .strokes()
                .filter(|item| is_near(item.stroke.vertex_color_fill, &references, params.threshold))
                .map(|item| item.key)
                .collect();
            keys.into_iter()
                .filter(|key| scene.set_stroke_select(*key, select))
                .count()
        }
        ColorTarget::Stroke => {
            let keys: Vec<PointKey> = scene
                .query()
                .points()
                .filter(|item| is_near(item.point.vertex_color, &references, params.threshold))
                .map(|item| item.key)
                .collect();
            let mut changed = 0;
            let mut strokes: Vec<StrokeKey> = Vec::new();
            for key in keys {
                if let Some(point) = scene.point_mut(key) {
                    if point.select != select {
                        point.select = select;
                        changed += 1;
                    }
                }
                if strokes.last() != Some(&key.stroke) {
                    strokes.push(key.stroke);
                }
            }
            for key in strokes {
                let any_selected = scene
                    .stroke(key)
                    .is_some_and(|s| s.points.iter().any(|p| p.select));
                scene.set_stroke_select(key, any_selected);
            }
            changed
        }
    };

    info!(
        "select_nearest_color: {} references, {} candidates changed",
        references.len(),
        changed
    );
    Ok(changed)
}
